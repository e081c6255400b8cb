//! Debouncing for rapid text-search input.

use std::time::Duration;
use tokio::sync::mpsc;

/// Debounce a stream of values: only the last value within a quiet window is
/// emitted downstream.
///
/// Keystroke bursts therefore produce a single query instead of one fetch
/// per keystroke. When the input channel closes, any pending value is
/// flushed immediately.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::Receiver<T>,
    window: Duration,
) -> mpsc::Receiver<T> {
    let (tx, output) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            match pending.take() {
                None => match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                },
                Some(value) => match tokio::time::timeout(window, input.recv()).await {
                    // Newer value within the window supersedes the pending one.
                    Ok(Some(newer)) => pending = Some(newer),
                    Ok(None) => {
                        let _ = tx.send(value).await;
                        break;
                    }
                    Err(_) => {
                        if tx.send(value).await.is_err() {
                            break;
                        }
                    }
                },
            }
        }
    });

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keystroke_burst_emits_only_the_final_value() {
        let (tx, rx) = mpsc::channel(16);
        let mut out = debounce(rx, Duration::from_millis(50));

        for prefix in ["c", "ch", "cha", "chap", "chape", "chapel"] {
            tx.send(prefix.to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        drop(tx);

        assert_eq!(out.recv().await, Some("chapel".to_string()));
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test]
    async fn values_separated_by_quiet_windows_all_pass() {
        let (tx, rx) = mpsc::channel(16);
        let mut out = debounce(rx, Duration::from_millis(20));

        tx.send(1u32).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        tx.send(2u32).await.unwrap();
        drop(tx);

        assert_eq!(out.recv().await, Some(1));
        assert_eq!(out.recv().await, Some(2));
        assert_eq!(out.recv().await, None);
    }
}
