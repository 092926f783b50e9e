//! Event log del orquestador en un fichero JSON lines.
//!
//! Una línea por evento, append-only. `seq` se asigna por namespace a partir
//! de los eventos ya escritos: el fichero se lee una vez en el primer append
//! y después se lleva la cuenta en memoria. Pensado para un único proceso
//! escritor.

use chrono::Utc;
use resinit_core::event::{ActionEvent, ActionEventKind, EventStore};
use resinit_core::InitializerError;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonlEventStore {
    path: PathBuf,
    /// Siguiente `seq` por namespace; `None` hasta el primer append.
    next_seq: Option<HashMap<String, u64>>,
}

impl JsonlEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(),
               next_seq: None }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn read_all(&self) -> Result<Vec<ActionEvent>, InitializerError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(store_err(&self.path, e)),
        };
        let mut events = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| store_err(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let ev: ActionEvent = serde_json::from_str(&line).map_err(|e| {
                                                                 InitializerError::Store(format!("{}:{}: {e}", self.path.display(), n + 1))
                                                             })?;
            events.push(ev);
        }
        Ok(events)
    }
}

fn store_err(path: &Path, e: std::io::Error) -> InitializerError { InitializerError::Store(format!("{}: {e}", path.display())) }

impl EventStore for JsonlEventStore {
    fn append_kind(&mut self, namespace: &str, kind: ActionEventKind) -> Result<ActionEvent, InitializerError> {
        if self.next_seq.is_none() {
            let mut counts = HashMap::new();
            for ev in self.read_all()? {
                *counts.entry(ev.namespace).or_insert(0u64) += 1;
            }
            self.next_seq = Some(counts);
        }
        let seq = self.next_seq
                      .as_ref()
                      .and_then(|c| c.get(namespace).copied())
                      .unwrap_or(0);
        let ev = ActionEvent { seq,
                               namespace: namespace.to_string(),
                               kind,
                               ts: Utc::now() };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| store_err(dir, e))?;
        }
        let line = serde_json::to_string(&ev).map_err(|e| InitializerError::Store(e.to_string()))?;
        let mut file = OpenOptions::new().create(true)
                                         .append(true)
                                         .open(&self.path)
                                         .map_err(|e| store_err(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| store_err(&self.path, e))?;
        if let Some(counts) = self.next_seq.as_mut() {
            counts.insert(namespace.to_string(), seq + 1);
        }
        Ok(ev)
    }

    fn list(&self, namespace: &str) -> Result<Vec<ActionEvent>, InitializerError> {
        Ok(self.read_all()?.into_iter().filter(|e| e.namespace == namespace).collect())
    }
}
