//! Relay Example - Content rendered into a Target elsewhere in the tree
//!
//! This example demonstrates:
//! - A header Target with fallback text
//! - A Relay mounted later that replaces the fallback
//! - Unmounting the Relay bringing the fallback back
//!
//! Run with: RUST_LOG=spark_relay=debug cargo run --example relay

use spark_relay::{create_relay_pair, mount, outline, PortalError, RelayProps, TargetProps};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), PortalError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== spark-relay Example ===\n");

    let toolbar = create_relay_pair(None);

    let handle = mount(|| {
        toolbar.target.render(TargetProps::text("no actions"));
        Ok(())
    })?;
    let Some(root) = handle.root() else {
        return Ok(());
    };

    println!("Target only:\n{}", outline(root));

    let relay = handle.update(|| toolbar.relay.render(RelayProps::text("Save")))?;
    println!("Relay mounted:\n{}", outline(root));

    relay();
    println!("Relay unmounted:\n{}", outline(root));

    handle.unmount();
    Ok(())
}
