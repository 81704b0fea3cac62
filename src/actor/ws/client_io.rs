use std::io::ErrorKind;
use std::net::TcpStream;
use std::time::Duration;

use tungstenite::protocol::Message;

use super::{Clients, WsActor};
use crate::reload::message::HotReloadMessage;

/// Poll interval of the reader thread.
const READ_POLL: Duration = Duration::from_millis(100);

impl WsActor {
    /// Complete the handshake and register the client.
    pub(super) fn add_client(&self, stream: TcpStream) {
        // Blocking during handshake, non-blocking afterwards for polled reads
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let connected = HotReloadMessage::connected();
                if let Err(e) = ws.send(Message::Text(connected.to_json().into())) {
                    crate::log!("ws"; "failed to send connected message: {}", e);
                    return;
                }
                let _ = ws.get_ref().set_nonblocking(true);

                let mut clients = self.clients.lock();
                clients.push(ws);
                crate::debug!("ws"; "client connected (total: {})", clients.len());
            }
            Err(e) => crate::log!("ws"; "handshake failed: {}", e),
        }
    }

    /// Background thread draining client frames so closes are noticed and
    /// pings are answered.
    pub(super) fn client_reader_loop(clients: Clients) {
        loop {
            std::thread::sleep(READ_POLL);
            if crate::core::is_shutdown() {
                break;
            }

            clients.lock().retain_mut(|client| match client.read() {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => true,
                Err(_) => false,
            });
        }
    }
}
