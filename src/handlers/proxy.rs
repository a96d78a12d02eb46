//! # Handler de Proxy
//! src/handlers/proxy.rs
//!
//! Reenvía bytes entre el cliente y el destino configurado:
//!
//! ```text
//!   +--------+     +------------+     +---------+
//!   | client | <-> | httpserver | <-> | destino |
//!   +--------+     +------------+     +---------+
//! ```
//!
//! Por cada conexión se lanzan dos threads de relay (uno por sentido) y el
//! worker espera a ambos antes de cerrar los dos sockets. El relay no mira
//! el contenido: copia bloques hasta fin de stream o error.
//!
//! Si el destino no se puede resolver o no acepta la conexión, se consume
//! el request del cliente y se responde 502 sin lanzar ningún relay.

use super::RequestHandler;
use crate::config::ProxyTarget;
use crate::http::{self, send_html_page, StatusCode};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::panic;
use std::thread::{self, ScopedJoinHandle};
use tracing::{debug, info, trace, warn};

/// Tamaño del bloque que copia cada relay
pub const RELAY_CHUNK_SIZE: usize = 8192;

const BAD_GATEWAY_PAGE: &str = "<center><h1>502 Bad Gateway</h1><hr></center>";

/// Bytes copiados en cada sentido durante una sesión
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub client_to_upstream: u64,
    pub upstream_to_client: u64,
}

/// Handler que reenvía cada conexión hacia un destino fijo
#[derive(Debug, Clone)]
pub struct ProxyHandler {
    target: ProxyTarget,
}

impl ProxyHandler {
    pub fn new(target: ProxyTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &ProxyTarget {
        &self.target
    }

    /// Resuelve el destino (sin cache) y prueba cada dirección en orden
    fn connect_upstream(&self) -> io::Result<TcpStream> {
        let addrs = (self.target.host.as_str(), self.target.port).to_socket_addrs()?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect(addr) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!("   ↪️  {} no disponible: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses found for {}", self.target.host),
            )
        }))
    }
}

impl RequestHandler for ProxyHandler {
    fn handle(&self, mut client: TcpStream) -> io::Result<()> {
        let upstream = match self.connect_upstream() {
            Ok(upstream) => upstream,
            Err(e) => {
                warn!("   ❌ No se pudo conectar con {}: {}", self.target, e);

                // Se lee el request antes de responder, aunque no se use
                if let Err(e) = http::parse_request(&mut client) {
                    debug!("   ❌ Parse error: {}", e);
                }
                send_html_page(&mut client, StatusCode::BadGateway, BAD_GATEWAY_PAGE)?;
                return Ok(());
            }
        };

        info!("   🔀 Relay abierto hacia {}", self.target);
        let stats = relay(&client, &upstream)?;
        info!(
            "   ✅ Relay cerrado: {} bytes →, {} bytes ←",
            stats.client_to_upstream, stats.upstream_to_client
        );

        // Ambos sockets se cierran al salir
        Ok(())
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}

/// Copia bytes en ambos sentidos hasta que los dos lados terminan
///
/// Lanza un thread por sentido y espera a ambos. Cuando un sentido llega a
/// fin de stream cierra la escritura del otro extremo para que el par vea
/// EOF.
pub fn relay(client: &TcpStream, upstream: &TcpStream) -> io::Result<RelayStats> {
    thread::scope(|scope| {
        let to_upstream = thread::Builder::new()
            .name("relay-client-upstream".to_string())
            .spawn_scoped(scope, move || pump(client, upstream))?;

        let to_client = match thread::Builder::new()
            .name("relay-upstream-client".to_string())
            .spawn_scoped(scope, move || pump(upstream, client))
        {
            Ok(handle) => handle,
            Err(e) => {
                // Sin el segundo relay el primero podría quedar leyendo para siempre
                let _ = client.shutdown(Shutdown::Both);
                let _ = upstream.shutdown(Shutdown::Both);
                return Err(e);
            }
        };

        Ok(RelayStats {
            client_to_upstream: join_relay(to_upstream),
            upstream_to_client: join_relay(to_client),
        })
    })
}

fn join_relay(handle: ScopedJoinHandle<'_, u64>) -> u64 {
    handle
        .join()
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
}

/// Lee de `from` y escribe en `to` hasta EOF o error; retorna los bytes copiados
fn pump(mut from: &TcpStream, mut to: &TcpStream) -> u64 {
    let mut buffer = [0u8; RELAY_CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match from.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("   relay: error de lectura: {}", e);
                break;
            }
        };

        if let Err(e) = to.write_all(&buffer[..n]) {
            debug!("   relay: error de escritura: {}", e);
            break;
        }

        total += n as u64;
        trace!("   relay: {} bytes", n);
    }

    let _ = to.shutdown(Shutdown::Write);
    total
}
