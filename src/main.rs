use bus_reservation::config::LogFormat;
use bus_reservation::core::export::export_bookings_csv;
use bus_reservation::utils::error::ErrorSeverity;
use bus_reservation::utils::{logger, validation::Validate};
use bus_reservation::{
    CliConfig, Command, FileStorage, Menu, Passenger, ReservationConfig, ReservationError,
    ReservationStore,
};
use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = cli
        .resolve()
        .context("failed to load configuration, make sure the file exists and is valid TOML")?;

    // 初始化日誌
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("🚀 Starting bus-reservation");
    tracing::debug!("Resolved config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let command = cli.command.clone().unwrap_or(Command::Menu);
    if let Err(e) = run(&config, command) {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        if e.severity() > ErrorSeverity::Low {
            eprintln!("💡 {}", e.recovery_suggestion());
        }

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run(config: &ReservationConfig, command: Command) -> bus_reservation::Result<()> {
    let storage = FileStorage::new(&config.storage.record_file);
    let mut store =
        ReservationStore::initialize_with_policy(config.to_bus(), storage, config.storage.on_malformed)?;

    match command {
        Command::Seats => print!("{}", store.view_seats()),
        Command::Book {
            seat,
            first_name,
            middle_name,
            last_name,
            contact,
        } => {
            let passenger = Passenger::new(first_name, middle_name, last_name, contact, seat);
            store.book_seat(seat, passenger)?;
            println!("Seat {} successfully booked!", seat);
            println!("Fare: ${:.2}", store.fare());
        }
        Command::Cancel { seat } => {
            store.cancel_seat(seat)?;
            println!("Seat {} has been successfully canceled.", seat);
        }
        Command::Summary { json } => {
            let bookings = store.list_bookings();
            if json {
                println!("{}", serde_json::to_string_pretty(&bookings)?);
            } else {
                println!("--- Booking Summary ---");
                for booking in &bookings {
                    println!("{}", booking);
                }
            }
        }
        Command::Search { query, json } => {
            let matches = store.search_passengers(&query);
            if matches.is_empty() {
                return Err(ReservationError::NoMatchesFound { query });
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                println!("--- Search Results ---");
                for booking in &matches {
                    println!("{}", booking);
                }
            }
        }
        Command::Fare => println!("{:.2}", store.fare()),
        Command::Export { output } => {
            let bookings = store.list_bookings();
            export_bookings_csv(&bookings, &output)?;
            println!("📁 Exported {} booking(s) to {}", bookings.len(), output);
        }
        Command::Menu => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut menu = Menu::new(stdin.lock(), stdout.lock());
            menu.run(&mut store)?;
        }
    }

    Ok(())
}
