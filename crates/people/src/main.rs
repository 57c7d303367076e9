//! folio-seed: load the sample people into the store named by `FOLIO_URI`

use anyhow::Context;
use folio_people::{sample_people, StoreContext};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ctx = StoreContext::from_env().context("failed to connect to the store")?;
    let people = ctx.people();

    let batch = people
        .create_many_people(sample_people())
        .context("failed to insert the sample batch")?;
    for person in &batch {
        info!(id = %person.id, name = %person.name, "Created person");
    }

    let juan = people
        .create_and_save_person()
        .context("failed to insert the sample person")?;
    info!(id = %juan.id, name = %juan.name, "Saved person");

    ctx.teardown().context("failed to close the store")?;
    Ok(())
}
