//! Sends a batch of invoices and polls their status.
//!
//! Needs `ETS_BASE_URL`, `ETS_API_KEY`, `ETS_API_SECRET`, `ETS_CUSTOMER_ID`
//! and `ETS_SOFTWARE_ID`. Set `RUST_LOG=ets=debug` to see every request.

use std::time::Duration;

use chrono::Local;
use ets::client::*;
use ets::core::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn invoices(count: usize) -> Result<Vec<Invoice>, EtsError> {
    let today = Local::now().date_naive();
    let seller = PartyBuilder::new(
        "ACME Yazılım A.Ş.",
        "1234567890",
        AddressBuilder::new("İstanbul").district("Kadıköy").build(),
    )
    .tax_office("Kadıköy")
    .build();

    (1..=count)
        .map(|i| {
            InvoiceBuilder::new(today)
                .profile(InvoiceProfile::EArsivFatura)
                .seller(seller.clone())
                .buyer(
                    PartyBuilder::new(
                        "Nihai Tüketici",
                        ANONYMOUS_TCKN,
                        AddressBuilder::new("İstanbul").build(),
                    )
                    .build(),
                )
                .add_line(
                    LineItemBuilder::new("1", format!("Abonelik #{i}"), dec!(1), "MON", dec!(249.90))
                        .build(),
                )
                .build()
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config.timeout(Duration::from_secs(15)),
        Err(e) => {
            eprintln!("{e}");
            eprintln!("set the ETS_* environment variables to run this demo");
            return Ok(());
        }
    };

    let client = LoggingClient::new(CachingClient::new(EtsClient::new(config)?));

    let seller = client.check_user("1234567890").await?;
    println!(
        "{} e-Fatura user: {}",
        seller.title.as_deref().unwrap_or(&seller.tax_id),
        seller.is_e_invoice_user
    );

    let bulk = BulkSender::with_options(
        client,
        BulkOptions {
            concurrency: 4,
            ..Default::default()
        },
    );
    let batch = invoices(10)?;
    let report = bulk.send_invoices(&batch).await;
    println!("sent {} / {}", report.succeeded, batch.len());
    for (index, err) in report.failures() {
        eprintln!("  invoice #{index} failed: {err}");
    }

    let uuids: Vec<_> = report.successes().map(|(_, sent)| sent.uuid).collect();
    let statuses = bulk.invoice_statuses(&uuids).await;
    for (_, info) in statuses.successes() {
        println!("  {} {:?}", info.uuid, info.status);
    }
    Ok(())
}
