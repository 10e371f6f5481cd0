//! In-memory [`CommandRunner`] for exercising the export path without
//! spawning anything.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use crate::process::{CommandRunner, ProcessError, ProcessOutput};

enum Scripted {
    Output(ProcessOutput),
    LaunchFailure,
}

/// Records every invocation and answers from a script.
/// Unscripted programs exit 0 with no output; only `ffmpeg` is on PATH
/// unless [`FakeRunner::with_binaries`] says otherwise.
pub struct FakeRunner {
    binaries: Vec<String>,
    delay: Option<Duration>,
    scripted: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    probes: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            binaries: vec!["ffmpeg".to_string()],
            delay: None,
            scripted: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            probes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_binaries(mut self, binaries: &[&str]) -> Self {
        self.binaries = binaries.iter().map(|b| b.to_string()).collect();
        self
    }

    /// Make every run take `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond(mut self, program: &str, output: ProcessOutput) -> Self {
        self.scripted.insert(program.to_string(), Scripted::Output(output));
        self
    }

    pub fn fail_launch(mut self, program: &str) -> Self {
        self.scripted.insert(program.to_string(), Scripted::LaunchFailure);
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|(program, _)| program).collect()
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.scripted.get(program) {
            Some(Scripted::Output(output)) => Ok(output.clone()),
            Some(Scripted::LaunchFailure) => Err(ProcessError::Launch {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            }),
            None => Ok(ProcessOutput {
                code: Some(0),
                ..Default::default()
            }),
        }
    }

    fn is_available(&self, program: &str) -> bool {
        self.probes.lock().unwrap().push(program.to_string());
        self.binaries.iter().any(|b| b == program)
    }
}
