use chrono::NaiveDate;
use achfile::core::*;
use rust_decimal_macros::dec;

fn main() {
    // Routing numbers: 9 digits with a 3-7-1 weighted checksum
    println!("Routing numbers:");
    for routing in ["021000021", "011000138", "123456789", "02100002", "02100002A"] {
        let verdict = if validate_routing_number(routing) { "valid" } else { "invalid" };
        println!("  {routing:<10} {verdict}");
    }
    if let Some(check) = routing_check_digit("12100035") {
        println!("  check digit for 12100035: {check}");
    }

    // Account numbers: 4-17 letters or digits
    println!("\nAccount numbers:");
    for account in ["000123456789", "12", "ABC-123", "12345678901234567"] {
        let verdict = if validate_account_number(account) { "valid" } else { "invalid" };
        println!("  {account:<18} {verdict}");
    }

    // Trace numbers: ODFI prefix + 7-digit sequence
    println!("\nTrace numbers:");
    for seq in [1, 2, 9_999_999, 10_000_000] {
        println!("  {:>10} -> {}", seq, generate_trace_number("09100001", seq));
    }

    // A batch with problems: every error is reported, not just the first
    let payday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    let batch = BatchBuilder::new("batch-2024-06-14", payday)
        .total_amount(dec!(999))
        .add_entry(
            EntryBuilder::credit("021000021", "000123456789", dec!(1500), payday)
                .payee("EMP-001", "Jane Roe")
                .build(),
        )
        .add_entry(EntryBuilder::credit("123456789", "12", dec!(10.005), payday).build())
        .build_unchecked();

    let errors = validate_batch(&batch);
    println!("\nBatch validation: {} errors", errors.len());
    for e in &errors {
        println!("  {e}");
    }

    // build() refuses the same batch
    let result = BatchBuilder::new("batch-2024-06-14", payday)
        .entries(batch.entries.clone())
        .build();
    if let Err(e) = result {
        println!("\nBuild failed: {e}");
    }
}
