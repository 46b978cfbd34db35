use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub const MINIMAL_CONFIG: &str = "[logging]\nlevel = \"info\"\nformat = \"pretty\"\n";

pub fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("pricehound-test-{nanos}-{n}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}
