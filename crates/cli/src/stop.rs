//! Cooperative stop signal for child processes.
//!
//! The supervisor holds each child's stdin pipe; closing it is the graceful
//! stop. Ctrl+C covers running a child process by hand.

use tokio::io::AsyncReadExt;
use tokio::sync::watch;
use tracing::debug;

/// Returns a watch receiver that flips to `true` when stdin reaches EOF or
/// Ctrl+C is received.
pub fn stop_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        let stdin_eof = async {
            let mut stdin = tokio::io::stdin();
            let mut buf = [0u8; 64];
            loop {
                match stdin.read(&mut buf).await {
                    // Any input content is discarded; EOF is the signal
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        };

        let ctrl_c = async {
            let _ = tokio::signal::ctrl_c().await;
        };

        tokio::select! {
            _ = stdin_eof => debug!("stdin closed, stopping"),
            _ = ctrl_c => debug!("interrupted, stopping"),
        }

        let _ = tx.send(true);
    });

    rx
}
