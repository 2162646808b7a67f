use super::model::LedgerEntry;

#[test]
fn test_credit_entry_is_positive() {
    let entry = LedgerEntry::new(1001, 2.0, "support accepted");

    assert_eq!(entry.telegram_id, 1001);
    assert_eq!(entry.amount, 2.0);
    assert_eq!(entry.reason, "support accepted");
    assert!(entry.created_at > 0);

    println!("✅ 测试通过: credit_entry_is_positive");
}

#[test]
fn test_debit_entry_keeps_signed_amount() {
    // Debits are stored with the sign; the running sum of entries must equal
    // the stored balance.
    let publish = LedgerEntry::new(1001, -3.0, "publish follow");
    assert_eq!(publish.amount, -3.0);
}

#[test]
fn test_entry_sum_matches_scenario_balance() {
    // Scenario from the product: signup 10, publish follow -3, support +2.
    let entries = vec![
        LedgerEntry::new(7, 10.0, "signup grant"),
        LedgerEntry::new(7, -3.0, "publish follow"),
        LedgerEntry::new(7, 2.0, "support accepted"),
    ];

    let sum: f64 = entries.iter().map(|e| e.amount).sum();
    assert_eq!(sum, 9.0);
}
