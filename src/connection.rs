//! Per-connection task.
//!
//! Commands from one connection are read, executed and answered strictly
//! in order; buffered pipelined frames are processed in arrival order. A
//! framing error gets one error reply and closes the connection, because
//! the decoder cannot resynchronize a length-prefixed protocol.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};
use tracing::debug;

use crate::{
    commands::CommandHandler,
    config::Config,
    keyspace::KeyValueStore,
    resp::RespValue,
};

pub async fn handle_client_connection(
    mut stream: TcpStream,
    config: Arc<Config>,
    store: Arc<KeyValueStore>,
) {
    let mut buffer = BytesMut::with_capacity(4096);

    'connection: loop {
        match stream.read_buf(&mut buffer).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("error reading from connection: {}", e);
                break;
            }
        }

        let frames = match RespValue::parse(&mut buffer) {
            Ok(frames) => frames,
            Err(e) => {
                debug!("protocol error, closing connection: {}", e);
                let reply = RespValue::Error("ERR Invalid RESP format".to_string()).encode();
                let _ = stream.write_all(&reply).await;
                break;
            }
        };

        for frame in frames {
            let response = match CommandHandler::new(&frame) {
                Ok(handler) => match handler.handle_command(&config, &store).await {
                    Ok(response) => response,
                    Err(e) => e.as_bytes(),
                },
                Err(e) => e.as_bytes(),
            };

            if let Err(e) = stream.write_all(&response).await {
                debug!("error writing to connection: {}", e);
                break 'connection;
            }
        }
    }
}
