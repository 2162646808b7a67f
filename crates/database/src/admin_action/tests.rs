use super::model::{AdminAction, AdminPayload};
use crate::status::ApprovalStatus;

#[test]
fn test_payload_serializes_with_kind_tag() {
    let grant = AdminPayload::GrantPoints { amount: 5.0 };
    let json = serde_json::to_value(&grant).unwrap();

    assert_eq!(json["kind"], "grant_points");
    assert_eq!(json["amount"], 5.0);

    let alias = AdminPayload::ChangeAlias {
        alias: "tiktoker".to_string(),
    };
    let json = serde_json::to_value(&alias).unwrap();

    assert_eq!(json["kind"], "change_alias");
    assert_eq!(json["alias"], "tiktoker");

    println!("✅ 测试通过: payload_serializes_with_kind_tag");
}

#[test]
fn test_payload_round_trip() {
    let original = AdminPayload::GrantPoints { amount: -2.5 };
    let json = serde_json::to_string(&original).unwrap();
    let parsed: AdminPayload = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, original);
}

#[test]
fn test_proposal_starts_pending_with_window() {
    let action = AdminAction::new_proposal(3003, 2002, AdminPayload::GrantPoints { amount: 5.0 }, 48 * 3600);

    assert_eq!(action.status, ApprovalStatus::Pending);
    assert_eq!(action.proposer_id, 3003);
    assert_eq!(action.target_id, 2002);
    assert_eq!(action.expires_at, action.created_at + 48 * 3600);
}

#[test]
fn test_primary_approver_proposal_short_circuits() {
    // No pending period when the proposer is the primary approver.
    let action = AdminAction::new_applied(
        890166032,
        2002,
        AdminPayload::ChangeAlias {
            alias: "nuevo".to_string(),
        },
    );

    assert_eq!(action.status, ApprovalStatus::Accepted);
    assert!(!action.is_expired(action.expires_at + 1000));
}

#[test]
fn test_describe_names_the_mutation() {
    assert_eq!(AdminPayload::GrantPoints { amount: 5.0 }.describe(), "otorgar 5 puntos");
    assert_eq!(
        AdminPayload::ChangeAlias { alias: "ana".to_string() }.describe(),
        "cambiar alias a @ana"
    );
}

#[test]
fn test_kind_str_matches_serde_tag() {
    assert_eq!(AdminPayload::GrantPoints { amount: 1.0 }.kind_str(), "grant_points");
    assert_eq!(
        AdminPayload::ChangeAlias { alias: "x".to_string() }.kind_str(),
        "change_alias"
    );
}
