use chrono::{NaiveDate, NaiveTime};
use ets::core::*;
use rust_decimal_macros::dec;

fn main() {
    let mut numbers = DocumentNumberSequence::new("ACM", 2024).expect("valid series");

    // Commercial e-Fatura between two registered companies
    let invoice = InvoiceBuilder::new(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        .number(numbers.next_number().expect("series not exhausted"))
        .issue_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap())
        .profile(InvoiceProfile::TicariFatura)
        .order_reference("SIP-2024-118", NaiveDate::from_ymd_opt(2024, 6, 1))
        .note("Ödeme 30 gün içinde yapılacaktır.")
        .seller(
            PartyBuilder::new(
                "ACME Yazılım A.Ş.",
                "1234567890",
                AddressBuilder::new("İstanbul")
                    .street("Bağdat Caddesi")
                    .building_number("112")
                    .district("Kadıköy")
                    .postal_code("34710")
                    .build(),
            )
            .tax_office("Kadıköy")
            .mersis_no("0123456789000015")
            .email("fatura@acme.com.tr")
            .alias("urn:mail:defaultgb@acme.com.tr")
            .build(),
        )
        .buyer(
            PartyBuilder::new(
                "Müşteri Ticaret Ltd. Şti.",
                "9876543217",
                AddressBuilder::new("Ankara").district("Çankaya").build(),
            )
            .tax_office("Çankaya")
            .alias("urn:mail:defaultpk@musteri.com.tr")
            .build(),
        )
        .add_line(
            LineItemBuilder::new("1", "Yazılım geliştirme", dec!(80), "HUR", dec!(950))
                .description("Haziran 2024 sprint çalışmaları")
                .build(),
        )
        .add_line(
            LineItemBuilder::new("2", "Barındırma (aylık)", dec!(1), "C62", dec!(1250))
                .discount_rate(dec!(10))
                .build(),
        )
        .add_line(
            LineItemBuilder::new("3", "Teknik kitap", dec!(4), "C62", dec!(375.50))
                .vat_rate(dec!(10))
                .build(),
        )
        .bank_transfer(
            "TR33 0006 1005 1978 6457 8413 26",
            NaiveDate::from_ymd_opt(2024, 7, 15),
        )
        .build()
        .expect("invoice should be valid");

    let totals = invoice.totals.as_ref().unwrap();
    println!("Invoice {} ({})", invoice.number.as_deref().unwrap_or("-"), invoice.uuid);
    println!("  Profile:   {}", invoice.profile.code());
    for line in &invoice.lines {
        println!(
            "  {:>2} {:<22} {:>8} {:<8} {:>10}",
            line.id,
            line.name,
            line.quantity,
            units::unit_name(&line.unit).unwrap_or(line.unit.as_str()),
            line.line_amount.unwrap_or_default()
        );
    }
    println!("  Net:       {} TRY", totals.tax_exclusive);
    for group in &totals.vat_breakdown {
        println!("  KDV %{}:   {} TRY", group.rate, group.tax_amount);
    }
    println!("  Payable:   {} TRY", totals.payable);

    let json = serde_json::to_string_pretty(&invoice).expect("invoice serializes");
    println!("\nRequest body ({} bytes):\n{json}", json.len());
}
