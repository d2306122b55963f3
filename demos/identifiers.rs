use ets::core::identifiers::*;

fn main() {
    println!("=== Tax identifiers ===");
    for input in [
        "1234567890",
        "1234567891",
        "10000000146",
        "01234567890",
        ANONYMOUS_TCKN,
        "12345",
    ] {
        match validate_tax_id(input) {
            Ok(TaxId::Vkn(v)) => println!("  {input:<12} VKN (company)     {v}"),
            Ok(TaxId::Tckn(t)) => println!("  {input:<12} TCKN (individual) {t}"),
            Err(e) => println!("  {input:<12} invalid: {e}"),
        }
    }

    println!("\n=== IBANs ===");
    for input in [
        "tr33 0006 1005 1978 6457 8413 26",
        "TR330006100519786457841327",
        "DE89 3704 0044 0532 0130 00",
        "TR33-0006",
    ] {
        match validate_iban(input) {
            Ok(iban) => println!("  {input:<36} ok: {}", format_iban(&iban)),
            Err(e) => println!("  {input:<36} invalid: {e}"),
        }
    }
}
