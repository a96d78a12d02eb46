//! # HTTP Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor: logging, configuración desde CLI,
//! manejo de Ctrl-C y arranque del loop de aceptación.

use httpserver::config::Config;
use httpserver::server::Server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "httpserver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .init();

    info!("=================================");
    info!("  httpserver HTTP/1.0");
    info!("=================================");

    // Crear configuración (CLI o variables de entorno)
    let config = Config::new();
    if let Err(e) = config.validate() {
        error!("💥 Configuración inválida: {}", e);
        std::process::exit(2);
    }
    config.print_summary();

    // SIGINT/SIGTERM: el SO libera el socket de escucha al salir
    if let Err(e) = ctrlc::set_handler(|| {
        info!("🛑 Señal recibida, cerrando servidor");
        std::process::exit(0);
    }) {
        error!("💥 No se pudo instalar el manejador de señales: {}", e);
        std::process::exit(1);
    }

    let result = Server::new(config).and_then(|server| server.run());

    if let Err(e) = result {
        error!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
