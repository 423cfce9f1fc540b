//! Property tests for version labels and the visa state machine.

use proptest::prelude::*;

use marche_docs::domain::document::{Document, DocumentStatus};
use marche_docs::domain::foundation::{MarcheId, UserId};
use marche_docs::domain::version::{Version, VersionLabel, VersionStatus};
use marche_docs::domain::visa::{VisaComment, VisaKind};
use marche_docs::domain::workflow::{apply_visa, diffuse, next_label, WorkflowError};

fn kind_strategy() -> impl Strategy<Value = VisaKind> {
    prop_oneof![
        Just(VisaKind::Vso),
        Just(VisaKind::Vao),
        Just(VisaKind::Refuse),
    ]
}

fn new_document() -> (Document, Version) {
    let mandataire = UserId::new("mandataire").unwrap();
    let document = Document::new(
        MarcheId::new(),
        "Plan".to_string(),
        "PLAN".to_string(),
        mandataire.clone(),
    )
    .unwrap();
    let version = Version::new(*document.id(), VersionLabel::first(), mandataire);
    (document, version)
}

proptest! {
    #[test]
    fn labels_parse_their_own_display(index in 0u8..26) {
        let label = (0..index).fold(VersionLabel::first(), |l, _| l.next().unwrap());
        prop_assert_eq!(VersionLabel::parse(&label.to_string()).unwrap(), label);
        prop_assert_eq!(label.index(), index);
    }

    #[test]
    fn next_label_is_strictly_increasing(index in 0u8..25) {
        let label = (0..index).fold(VersionLabel::first(), |l, _| l.next().unwrap());
        let next = next_label(label).unwrap();
        prop_assert!(next > label);
        prop_assert_eq!(next.index(), label.index() + 1);
    }

    /// Any sequence of VAO verdicts ending in a final one keeps exactly one
    /// version awaiting work and labels in order.
    #[test]
    fn verdict_sequences_keep_one_live_version(
        observations in 0usize..10,
        last in kind_strategy(),
    ) {
        let (mut document, mut current) = new_document();
        let moe = UserId::new("moe").unwrap();
        let mut history = Vec::new();

        let mut kinds = vec![VisaKind::Vao; observations];
        kinds.push(last);

        for kind in kinds {
            diffuse(&mut document, &mut current).unwrap();
            let comment = VisaComment::new(kind, "observations du MOE", 3).unwrap();
            let outcome = apply_visa(&mut document, &mut current, &comment, &moe).unwrap();
            prop_assert_eq!(outcome.version_status, kind.version_outcome());
            prop_assert_eq!(document.status(), kind.document_outcome());

            let spawned = outcome.spawned;
            history.push(current.clone());
            match spawned {
                Some(next) => {
                    prop_assert_eq!(next.status(), VersionStatus::EnAttenteDiffusion);
                    prop_assert_eq!(document.current_version(), next.label());
                    current = next;
                }
                None => break,
            }
        }

        let expected_len = observations + 1;
        prop_assert_eq!(history.len(), expected_len);
        for pair in history.windows(2) {
            prop_assert!(pair[0].label() < pair[1].label());
        }
        if last == VisaKind::Vao {
            prop_assert_eq!(current.status(), VersionStatus::EnAttenteDiffusion);
            prop_assert_eq!(current.label().index() as usize, expected_len);
        } else {
            prop_assert_eq!(current.status(), last.version_outcome());
        }
        prop_assert_eq!(document.status(), last.document_outcome());
        prop_assert!(document.status() != DocumentStatus::Refuse);
    }

    #[test]
    fn second_verdict_on_same_version_fails(first in kind_strategy(), second in kind_strategy()) {
        let (mut document, mut version) = new_document();
        let moe = UserId::new("moe").unwrap();
        diffuse(&mut document, &mut version).unwrap();

        let comment = VisaComment::new(first, "motif", 3).unwrap();
        apply_visa(&mut document, &mut version, &comment, &moe).unwrap();

        let comment = VisaComment::new(second, "motif", 3).unwrap();
        let result = apply_visa(&mut document, &mut version, &comment, &moe);
        prop_assert!(result.is_err());
        let is_state_error = matches!(
            result,
            Err(WorkflowError::VersionNotCurrent { .. })
                | Err(WorkflowError::VersionNotAwaitingVisa { .. })
                | Err(WorkflowError::DocumentNotAwaitingVisa { .. })
        );
        prop_assert!(is_state_error);
    }
}

#[test]
fn z_is_the_last_label() {
    let z = VersionLabel::parse("Z").unwrap();
    assert!(z.next().is_none());
    assert!(matches!(
        next_label(z),
        Err(WorkflowError::LabelExhausted { .. })
    ));
}
