use super::model::Interaction;
use crate::status::ApprovalStatus;
use crate::support_item::model::SupportKind;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

#[test]
fn test_new_claim_starts_pending() {
    let item_id = ObjectId::new();
    let claim = Interaction::new_claim(SupportKind::Follow, item_id, 2002, 1001, 2.0, 48 * 3600);

    assert_eq!(claim.status, ApprovalStatus::Pending);
    assert_eq!(claim.kind, SupportKind::Follow);
    assert_eq!(claim.item_id, item_id);
    assert_eq!(claim.actor_id, 2002);
    assert_eq!(claim.owner_id, 1001);
    assert_eq!(claim.points, 2.0);

    println!("✅ 测试通过: new_claim_starts_pending");
}

#[test]
fn test_expiry_is_created_plus_window() {
    let claim = Interaction::new_claim(SupportKind::Video, ObjectId::new(), 2002, 1001, 3.0, 48 * 3600);

    assert_eq!(claim.expires_at, claim.created_at + 48 * 3600);
}

#[test]
fn test_is_expired_only_past_deadline() {
    let claim = Interaction::new_claim(SupportKind::Follow, ObjectId::new(), 2002, 1001, 2.0, 3600);
    let now = Utc::now().timestamp();

    assert!(!claim.is_expired(now));
    assert!(claim.is_expired(claim.expires_at));
    assert!(claim.is_expired(claim.expires_at + 1));
}

#[test]
fn test_terminal_claim_is_never_expired() {
    // A resolved row must not be picked up by the sweep however old it is.
    let mut claim = Interaction::new_claim(SupportKind::Follow, ObjectId::new(), 2002, 1001, 2.0, 0);
    claim.status = ApprovalStatus::Accepted;

    assert!(!claim.is_expired(claim.expires_at + 1000));
}

#[test]
fn test_points_are_frozen_at_creation() {
    // The claim keeps the points it was created with; configuration changes
    // afterwards must not affect rows in flight.
    let claim = Interaction::new_claim(SupportKind::Video, ObjectId::new(), 2002, 1001, 3.0, 3600);
    assert_eq!(claim.points, 3.0);

    let reconfigured = Interaction::new_claim(SupportKind::Video, ObjectId::new(), 2002, 1001, 5.0, 3600);
    assert_eq!(claim.points, 3.0);
    assert_eq!(reconfigured.points, 5.0);
}
