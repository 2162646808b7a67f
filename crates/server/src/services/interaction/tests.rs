use super::interaction_service::InteractionService;
use database::{ApprovalStatus, Interaction, SupportKind};
use mongodb::bson::oid::ObjectId;

fn claim(kind: SupportKind, points: f64) -> Interaction {
    Interaction::new_claim(kind, ObjectId::new(), 2002, 1001, points, 48 * 3600)
}

#[test]
fn test_claim_request_names_actor_and_points() {
    let id = ObjectId::new();
    let text = InteractionService::claim_request_text(SupportKind::Follow, "@ana", &id, 2.0);

    assert!(text.contains("@ana"));
    assert!(text.contains(&id.to_string()));
    assert!(text.contains("2 puntos"));
    assert!(text.starts_with("📈"));

    println!("✅ 测试通过: claim_request_names_actor_and_points");
}

#[test]
fn test_claim_request_varies_by_kind() {
    let id = ObjectId::new();

    let follow = InteractionService::claim_request_text(SupportKind::Follow, "@ana", &id, 2.0);
    let video = InteractionService::claim_request_text(SupportKind::Video, "@ana", &id, 3.0);
    let live = InteractionService::claim_request_text(SupportKind::Live, "@ana", &id, 3.0);

    assert!(follow.contains("siguió tu perfil"));
    assert!(video.contains("apoyó tu video"));
    assert!(live.contains("estuvo en tu live"));
}

#[test]
fn test_accepted_outcome_reports_points() {
    let mut interaction = claim(SupportKind::Video, 3.0);
    interaction.status = ApprovalStatus::Accepted;

    let text = InteractionService::outcome_text(&interaction);
    assert!(text.contains("aprobado"));
    assert!(text.contains("3 puntos"));
}

#[test]
fn test_auto_accepted_outcome_mentions_no_response() {
    let mut interaction = claim(SupportKind::Follow, 2.0);
    interaction.status = ApprovalStatus::AutoAccepted;

    let text = InteractionService::outcome_text(&interaction);
    assert!(text.contains("automáticamente"));
}

#[test]
fn test_rejected_outcome_has_no_points() {
    let mut interaction = claim(SupportKind::Follow, 2.0);
    interaction.status = ApprovalStatus::Rejected;

    let text = InteractionService::outcome_text(&interaction);
    assert!(text.contains("rechazado"));
    assert!(!text.contains("puntos."));
}
