//! Faults are visible to a host-installed `tracing` subscriber.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::{fail_debug, fault_count, suppress_faults};

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    log.contents()
}

#[test]
fn test_fault_is_logged_at_error_level() {
    let _guard = suppress_faults();
    let before = fault_count();

    let output = capture(|| fail_debug!("inbox row configured twice"));

    assert_eq!(fault_count(), before + 1);
    assert!(output.contains("ERROR"), "output: {output}");
    assert!(output.contains("inbox row configured twice"), "output: {output}");
    assert!(output.contains("trellis_core::fault"), "output: {output}");
}

#[test]
fn test_passing_assertion_logs_nothing() {
    let _guard = suppress_faults();
    let output = capture(|| {
        trellis_core::assert_debug!(2 > 1, "unreachable");
    });
    assert!(!output.contains("unreachable"));
}
