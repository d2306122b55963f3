use chrono::NaiveDate;
use ets::core::*;
use rust_decimal_macros::dec;

fn main() {
    let day = |d| NaiveDate::from_ymd_opt(2024, 9, d).unwrap();
    let cooperative = PartyBuilder::new(
        "Anadolu Tarım Ürünleri A.Ş.",
        "4567890128",
        AddressBuilder::new("Konya").district("Selçuklu").build(),
    )
    .tax_office("Selçuk")
    .build();

    // e-Müstahsil: the merchant buys wheat from a farmer and withholds stopaj
    let receipt = ProducerReceiptBuilder::new(day(2))
        .number("MST2024000000017")
        .issuer(cooperative.clone())
        .producer(
            PartyBuilder::new(
                "Ahmet Yılmaz",
                "10000000146",
                AddressBuilder::new("Konya").district("Cihanbeyli").build(),
            )
            .person("Ahmet", "Yılmaz")
            .build(),
        )
        .add_line(ReceiptLineBuilder::new("1", "Buğday", dec!(1000), "KGM", dec!(12.50)).build())
        .add_line(ReceiptLineBuilder::new("2", "Arpa", dec!(400), "KGM", dec!(9.75)).build())
        .build()
        .expect("receipt should be valid");

    let totals = receipt.totals.as_ref().unwrap();
    println!("Producer receipt {}", receipt.number.as_deref().unwrap_or("-"));
    println!("  Gross:      {} TRY", totals.gross_total);
    println!("  Stopaj:     {} TRY", totals.withholding_total);
    println!("  Net payable: {} TRY", totals.net_payable);

    // e-İrsaliye: ship the grain to a mill with the company's own truck
    let dispatch = DispatchBuilder::new(day(3), day(3))
        .number("IRS2024000000204")
        .supplier(cooperative)
        .customer(
            PartyBuilder::new(
                "Ova Un Sanayi Ltd. Şti.",
                "9876543217",
                AddressBuilder::new("Karaman").build(),
            )
            .build(),
        )
        .driver("Mehmet", "Kaya", "12345678950")
        .vehicle_plate("42ABC123")
        .add_line(
            DispatchLineBuilder::new("1", "Buğday", dec!(1000), "KGM")
                .unit_price(dec!(12.50))
                .build(),
        )
        .build()
        .expect("dispatch should be valid");

    println!("\nDispatch {}", dispatch.number.as_deref().unwrap_or("-"));
    println!("  Ships on:   {}", dispatch.shipment.shipment_date);
    println!("  Deliver to: {}", dispatch.shipment.delivery_address.city);
    println!("  Plate:      {}", dispatch.shipment.vehicle_plate.as_deref().unwrap_or("-"));

    // Missing transport details are reported with field paths
    let broken = DispatchBuilder::new(day(5), day(4))
        .supplier(receipt.issuer.clone())
        .customer(receipt.issuer.clone())
        .add_line(DispatchLineBuilder::new("1", "Arpa", dec!(400), "KGM").build())
        .build_unchecked()
        .expect("parties present");
    println!("\nProblems with an incomplete dispatch note:");
    for error in validate_dispatch(&broken) {
        println!("  {error}");
    }
}
