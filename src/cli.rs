use envconf::{EnvConfig, Loader, RequiredPolicy, format_config_errors, load_config};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, EnvConfig)]
pub struct ServiceConfig {
    #[field(env = "SERVICE_NAME", default = "envconf-demo")]
    pub name: String,

    #[field(env = "SERVICE_PORT", default = "8080")]
    pub port: i32,

    #[field(env = "SERVICE_DEBUG", default = "false")]
    pub debug: bool,

    #[field(env = "SERVICE_API_KEY", required)]
    pub api_key: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(arg) => match arg.as_str() {
            "load" => load(),
            "check" => check(),
            "fields" => show_fields(),
            "docs" => generate_docs(args.next().as_deref().unwrap_or("CONFIG.md")),
            _ => println!(
                "unknown arg: {}. Available: load, check, fields, docs",
                arg
            ),
        },
        None => {
            println!("Usage: envconf-cli [command]");
            println!("Commands:");
            println!("  load         - Load ServiceConfig, exiting on the first error");
            println!("  check        - Load ServiceConfig, accepting required values set only in the environment, and list every error");
            println!("  fields       - Show field metadata");
            println!("  docs [path]  - Write markdown documentation (default CONFIG.md)");
        }
    };
}

fn print_config(config: &ServiceConfig) {
    println!("  name: {}", config.name);
    println!("  port: {}", config.port);
    println!("  debug: {}", config.debug);
    println!("  api_key: {}", if config.api_key.is_empty() { "<unset>" } else { "<set>" });
}

fn load() {
    let mut config = ServiceConfig::default();
    // The built-in handler exits the process, so reaching the match means success
    match load_config(&mut config) {
        Ok(()) => {
            println!("Config loaded successfully!");
            print_config(&config);
        }
        Err(errors) => eprintln!("{}", errors),
    }
}

fn check() {
    let mut config = ServiceConfig::default();
    let mut loader = Loader::new().required_policy(RequiredPolicy::Resolved);
    match loader.load(&mut config) {
        Ok(()) => {
            println!("Config loaded successfully!");
            print_config(&config);
        }
        Err(errors) => {
            eprintln!("{}", format_config_errors(&errors));
            std::process::exit(1);
        }
    }
}

fn show_fields() {
    println!("ServiceConfig fields:");
    for field in ServiceConfig::fields() {
        println!("  {}:", field.name);
        println!("    type: {}", field.kind);
        println!("    env: {}", field.env);
        println!("    default: {}", field.default);
        println!("    required: {}", field.required);
    }
}

fn generate_docs(path: &str) {
    println!("Generating documentation for ServiceConfig...");
    match ServiceConfig::write_docs(path) {
        Ok(_) => println!("✓ Documentation written to {}", path),
        Err(e) => eprintln!("✗ Failed to write documentation: {}", e),
    }
}
