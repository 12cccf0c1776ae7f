//! Manifest validation.
//!
//! Validation does not stop at the first problem: every check runs and all
//! violations are reported together, so a broken manifest can be fixed in
//! one pass.
//!
//! Only the presentation itself is checked before startup. Recordings are
//! checked when a deep link selects one; a broken recording falls back to
//! an unrecorded session and never stops the presentation from loading.

use super::error::{ManifestError, ManifestViolation};
use super::{LiveRecording, Manifest};
use crate::core::StepGraph;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::warn;

type Check = Validation<(), NonEmptyVec<ManifestViolation>>;

/// Run every presentation check, accumulating all violations.
pub fn check_manifest(manifest: &Manifest) -> Check {
    let graph = manifest.graph();
    let mut checks: Vec<Check> = vec![presentation_named(manifest), root_has_slide(manifest)];
    checks.extend(slides_known(manifest, &graph));

    Validation::all_vec(checks).map(|_| ())
}

/// [`check_manifest`] as a `Result`.
pub fn validate(manifest: &Manifest) -> Result<(), ManifestError> {
    match check_manifest(manifest) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(violations) => Err(ManifestError::Invalid(
            violations.iter().cloned().collect(),
        )),
    }
}

/// Run every check on the recording at `index`, accumulating all violations.
pub fn check_recording(index: usize, recording: &LiveRecording, graph: &StepGraph) -> Check {
    Validation::all_vec(recording_checks(index, recording, graph)).map(|_| ())
}

/// Whether the recording at `index` can be replayed.
///
/// Unknown steps are skipped during replay and only warned about. A recording
/// without a single known step, or with broken timings, is not replayable.
pub fn replayable(index: usize, recording: &LiveRecording, graph: &StepGraph) -> bool {
    let Validation::Failure(violations) = check_recording(index, recording, graph) else {
        return true;
    };

    let mut replayable = recording
        .steps
        .iter()
        .any(|entry| graph.find_path(&entry.step).is_some());
    for violation in violations.iter() {
        warn!(recording = index, %violation, "recording problem");
        if !matches!(violation, ManifestViolation::UnknownStep { .. }) {
            replayable = false;
        }
    }
    replayable
}

fn presentation_named(manifest: &Manifest) -> Check {
    if manifest.presentation.trim().is_empty() {
        Validation::fail(ManifestViolation::EmptyPresentation)
    } else {
        Validation::success(())
    }
}

fn root_has_slide(manifest: &Manifest) -> Check {
    if manifest.tree.slide.is_some() {
        Validation::success(())
    } else {
        Validation::fail(ManifestViolation::RootWithoutSlide)
    }
}

fn slides_known(manifest: &Manifest, graph: &StepGraph) -> Vec<Check> {
    let mut seen = std::collections::BTreeSet::new();
    graph
        .iter()
        .filter_map(|step| step.slide())
        .filter(|slide| seen.insert(*slide))
        .map(|slide| {
            if manifest.slide_dict.contains_key(slide) {
                Validation::success(())
            } else {
                Validation::fail(ManifestViolation::UnknownSlide {
                    slide: slide.to_string(),
                })
            }
        })
        .collect()
}

fn recording_checks(index: usize, recording: &LiveRecording, graph: &StepGraph) -> Vec<Check> {
    if recording.steps.is_empty() {
        return vec![Validation::fail(ManifestViolation::EmptyRecording {
            recording: index,
        })];
    }

    let mut checks = vec![Validation::success(())];
    let mut previous_start = 0.0_f64;

    for (entry, step) in recording.steps.iter().enumerate() {
        if graph.find_path(&step.step).is_none() {
            checks.push(Validation::fail(ManifestViolation::UnknownStep {
                recording: index,
                path: step.step.clone(),
            }));
        }

        for value in std::iter::once(step.start).chain(step.duration) {
            if !value.is_finite() || value < 0.0 {
                checks.push(Validation::fail(ManifestViolation::InvalidTime {
                    recording: index,
                    entry,
                    value,
                }));
            }
        }

        if step.start < previous_start {
            checks.push(Validation::fail(ManifestViolation::OutOfOrder {
                recording: index,
                entry,
            }));
        }
        previous_start = step.start;
    }

    checks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CaptureMode, StepNode};
    use crate::manifest::RecordedStep;
    use std::collections::BTreeMap;

    fn manifest() -> Manifest {
        Manifest {
            presentation: "Talk".into(),
            tree: StepNode::new()
                .slide("intro")
                .child(StepNode::new())
                .child(StepNode::new().slide("details")),
            slide_dict: BTreeMap::from([
                ("intro".to_string(), "intro".to_string()),
                ("details".to_string(), "details".to_string()),
            ]),
            live: Vec::new(),
        }
    }

    fn recording(steps: Vec<RecordedStep>) -> LiveRecording {
        LiveRecording {
            id: None,
            mode: CaptureMode::Timed,
            recorded_at: None,
            length: 0.0,
            sound: None,
            steps,
        }
    }

    fn at(path: &[usize], start: f64, duration: Option<f64>) -> RecordedStep {
        RecordedStep {
            step: path.to_vec(),
            start,
            duration,
        }
    }

    #[test]
    fn valid_manifest_passes() {
        let mut m = manifest();
        m.live.push(recording(vec![
            at(&[], 0.0, Some(1.0)),
            at(&[1], 1.0, Some(2.0)),
        ]));
        assert!(check_manifest(&m).is_success());
        assert!(validate(&m).is_ok());
        assert!(check_recording(0, &m.live[0], &m.graph()).is_success());
        assert!(replayable(0, &m.live[0], &m.graph()));
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let mut m = manifest();
        m.presentation = "  ".into();
        m.slide_dict.remove("details");
        m.tree.slide = None;

        match check_manifest(&m) {
            Validation::Failure(errors) => {
                let errors: Vec<_> = errors.iter().cloned().collect();
                assert!(errors.contains(&ManifestViolation::EmptyPresentation));
                assert!(errors.contains(&ManifestViolation::RootWithoutSlide));
                assert!(errors.contains(&ManifestViolation::UnknownSlide {
                    slide: "details".into()
                }));
                assert_eq!(errors.len(), 3);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn broken_recordings_do_not_invalidate_the_manifest() {
        let mut m = manifest();
        m.live.push(recording(vec![at(&[3], 0.0, None)]));
        m.live.push(recording(Vec::new()));
        assert!(validate(&m).is_ok());
    }

    #[test]
    fn recording_checks_accumulate_all_violations() {
        let m = manifest();
        let rec = recording(vec![at(&[5], 2.0, None), at(&[0], 1.0, Some(-1.0))]);

        match check_recording(0, &rec, &m.graph()) {
            Validation::Failure(errors) => {
                let errors: Vec<_> = errors.iter().cloned().collect();
                assert!(errors.contains(&ManifestViolation::UnknownStep {
                    recording: 0,
                    path: vec![5]
                }));
                assert!(errors.contains(&ManifestViolation::InvalidTime {
                    recording: 0,
                    entry: 1,
                    value: -1.0
                }));
                assert!(errors.contains(&ManifestViolation::OutOfOrder {
                    recording: 0,
                    entry: 1
                }));
                assert_eq!(errors.len(), 3);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn unknown_steps_alone_keep_a_recording_replayable() {
        let m = manifest();
        let graph = m.graph();
        let partly_known = recording(vec![at(&[], 0.0, Some(1.0)), at(&[7], 1.0, None)]);
        let all_unknown = recording(vec![at(&[7], 0.0, None)]);
        let empty = recording(Vec::new());
        let bad_time = recording(vec![at(&[], -1.0, None)]);

        assert!(replayable(0, &partly_known, &graph));
        assert!(!replayable(0, &all_unknown, &graph));
        assert!(!replayable(0, &empty, &graph));
        assert!(!replayable(0, &bad_time, &graph));
    }

    #[test]
    fn root_must_name_a_slide() {
        let mut m = manifest();
        m.tree.slide = None;
        let result = validate(&m);
        match result {
            Err(ManifestError::Invalid(violations)) => {
                assert!(violations.contains(&ManifestViolation::RootWithoutSlide))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn nan_time_is_rejected() {
        let m = manifest();
        let rec = recording(vec![at(&[], f64::NAN, None)]);
        assert!(check_recording(0, &rec, &m.graph()).is_failure());
    }
}
