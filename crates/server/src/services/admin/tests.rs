use super::admin_service::AdminService;
use database::{AdminAction, AdminPayload, ApprovalStatus};

fn applied_action(payload: AdminPayload) -> AdminAction {
    AdminAction::new_applied(890166032, 2002, payload)
}

#[test]
fn test_positive_grant_notifies_target_as_gift() {
    let action = applied_action(AdminPayload::GrantPoints { amount: 5.0 });
    let text = AdminService::target_text(&action).unwrap();

    assert!(text.contains("Has recibido"));
    assert!(text.contains("5"));

    println!("✅ 测试通过: positive_grant_notifies_target_as_gift");
}

#[test]
fn test_negative_grant_reports_the_deduction() {
    let action = applied_action(AdminPayload::GrantPoints { amount: -2.0 });
    let text = AdminService::target_text(&action).unwrap();

    assert!(text.contains("descontó"));
    assert!(text.contains("2"));
    assert!(!text.contains("-2"));
}

#[test]
fn test_alias_change_names_the_new_alias() {
    let action = applied_action(AdminPayload::ChangeAlias {
        alias: "nueva".to_string(),
    });
    let text = AdminService::target_text(&action).unwrap();

    assert!(text.contains("@nueva"));
}

#[test]
fn test_pending_and_rejected_actions_notify_nothing() {
    let mut pending = AdminAction::new_proposal(3003, 2002, AdminPayload::GrantPoints { amount: 5.0 }, 3600);
    assert!(AdminService::target_text(&pending).is_none());

    pending.status = ApprovalStatus::Rejected;
    assert!(AdminService::target_text(&pending).is_none());
}

#[test]
fn test_auto_accepted_action_notifies_like_accepted() {
    let mut action = AdminAction::new_proposal(3003, 2002, AdminPayload::GrantPoints { amount: 5.0 }, 3600);
    action.status = ApprovalStatus::AutoAccepted;

    let text = AdminService::target_text(&action).unwrap();
    assert!(text.contains("Has recibido"));
}
