//! Prints the type table of the configured registry, or resolves the type
//! labels given as arguments.

use tracing::warn;
use tracing_subscriber::EnvFilter;

use semtypes::error::Result;
use semtypes::registry::is_hidden_type;
use semtypes::settings::Settings;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!(error = %e, "using default settings");
        Settings::default()
    });
    let system = settings.type_system()?;
    let registry = system.instance()?;
    let registry = registry.read()?;

    let labels: Vec<String> = std::env::args().skip(1).collect();
    if labels.is_empty() {
        for type_id in registry.type_ids() {
            let label = match registry.find_type_label(type_id) {
                "" if is_hidden_type(type_id) => "(hidden)",
                "" => "-",
                label => label,
            };
            let handler = registry
                .data_type_class_by_id(type_id)
                .map(|handler| handler.name())
                .unwrap_or("-");
            println!("{:<8} {:<26} {:<20} {}", type_id, label, handler, registry.data_item_id(type_id));
        }
    } else {
        for label in &labels {
            match registry.find_type_id(label, true) {
                "" => println!("{}: unknown type", label),
                type_id => println!("{}: {} ({})", label, type_id, registry.data_item_id(type_id)),
            }
        }
    }
    Ok(())
}
