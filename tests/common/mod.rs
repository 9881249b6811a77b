#![allow(dead_code)]

use std::fs;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

pub const USER_ID: &str = "user-1";
pub const ANON_KEY: &str = "anon-key";
pub const ACCESS_TOKEN: &str = "session-token";
pub const TMDB_TOKEN: &str = "tmdb-token";

/// Variables the binary reads; cleared so the caller's shell never leaks in.
const WATCHLIST_ENV: &[&str] = &[
    "WATCHLIST_CONFIG_DIR",
    "WATCHLIST_STORE_URL",
    "WATCHLIST_ANON_KEY",
    "WATCHLIST_USER_ID",
    "WATCHLIST_ACCESS_TOKEN",
    "WATCHLIST_LOG",
    "TMDB_TOKEN",
];

/// Helper struct to run watchlist commands against an isolated config dir
pub struct WatchlistTest {
    pub config_dir: TempDir,
    env: Vec<(String, String)>,
}

impl WatchlistTest {
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp directory");
        WatchlistTest {
            config_dir,
            env: Vec::new(),
        }
    }

    /// Point the binary at a store and sign in as [`USER_ID`].
    pub fn with_store(self, url: &str) -> Self {
        self.with_env("WATCHLIST_STORE_URL", url)
            .with_env("WATCHLIST_ANON_KEY", ANON_KEY)
            .with_env("WATCHLIST_USER_ID", USER_ID)
            .with_env("WATCHLIST_ACCESS_TOKEN", ACCESS_TOKEN)
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn write_config(&self, yaml: &str) {
        fs::write(self.config_dir.path().join("config.yaml"), yaml)
            .expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_dir.path().join("config.yaml"))
            .expect("Failed to read config file")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_watchlist"));
        for key in WATCHLIST_ENV {
            command.env_remove(key);
        }
        command
            .args(args)
            .env("WATCHLIST_CONFIG_DIR", self.config_dir.path())
            .env("NO_COLOR", "1")
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(self.config_dir.path())
            .output()
            .expect("Failed to execute watchlist command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Invalid JSON from {args:?}: {e}\n{stdout}"))
    }
}

/// A stored movie row as the hosted table returns it.
pub fn movie_row(id: &str, title: &str, categories: &[&str], watched: bool) -> Value {
    json!({
        "id": id,
        "user_id": USER_ID,
        "title": title,
        "categories": categories,
        "year": null,
        "poster_url": null,
        "watched": watched,
        "notes": null,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z",
    })
}

/// `n` uncategorized rows titled "Movie 1" .. "Movie n", newest first.
pub fn numbered_rows(n: usize) -> Value {
    Value::Array(
        (1..=n)
            .map(|i| movie_row(&format!("m{i:03}"), &format!("Movie {i}"), &[], false))
            .collect(),
    )
}
