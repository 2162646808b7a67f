use super::model::{publish_reason, SupportItem, SupportKind};
use std::str::FromStr;

#[test]
fn test_kind_round_trips_through_str() {
    for kind in [SupportKind::Follow, SupportKind::Video, SupportKind::Live] {
        let parsed = SupportKind::from_str(kind.as_str()).unwrap();
        assert_eq!(parsed, kind);
    }

    assert!(SupportKind::from_str("coupon").is_err());
    println!("✅ 测试通过: kind_round_trips_through_str");
}

#[test]
fn test_kind_serializes_as_snake_case() {
    let json = serde_json::to_string(&SupportKind::Follow).unwrap();
    assert_eq!(json, "\"follow\"");
}

#[test]
fn test_new_item_is_owned_and_timestamped() {
    let item = SupportItem::new(
        1001,
        SupportKind::Video,
        "https://tiktok.com/@user/video/1",
        Some("Mi video".to_string()),
        Some("Baile nuevo".to_string()),
    );

    assert_eq!(item.owner_id, 1001);
    assert_eq!(item.kind, SupportKind::Video);
    assert!(item.id.is_none());
    assert!(item.created_at > 0);
}

#[test]
fn test_follow_items_carry_no_title() {
    let item = SupportItem::new(1001, SupportKind::Follow, "https://tiktok.com/@user", None, None);

    assert!(item.title.is_none());
    assert!(item.description.is_none());
}

#[test]
fn test_publish_reason_names_the_kind() {
    assert_eq!(publish_reason(SupportKind::Follow), "publish follow");
    assert_eq!(publish_reason(SupportKind::Video), "publish video");
    assert_eq!(publish_reason(SupportKind::Live), "publish live");
}
