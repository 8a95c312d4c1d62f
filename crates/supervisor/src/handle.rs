//! AgentHandle - one managed process and its respawn parameters.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use contracts::SimError;
use tokio::process::{Child, ChildStdin, Command};
use tracing::{debug, error, warn};

/// How the supervisor reacts when this process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedRole {
    /// Exits when its trajectory completes; logged, never restarted
    Emitter,
    /// Always restarted with its original parameters
    Sensor,
    /// Logged, not restarted
    Fusion,
    /// External; excluded from the idle-shutdown cascade
    Visualizer,
}

impl ManagedRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagedRole::Emitter => "emitter",
            ManagedRole::Sensor => "sensor",
            ManagedRole::Fusion => "fusion",
            ManagedRole::Visualizer => "visualizer",
        }
    }
}

/// Lifecycle state of one managed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Starting,
    Running,
    Exited,
    Restarting,
    Terminated,
}

/// Original construction parameters, kept verbatim for respawn.
#[derive(Debug, Clone)]
pub struct RespawnSpec {
    program: PathBuf,
    args: Vec<String>,
}

impl RespawnSpec {
    /// Re-invoke the current executable with the given subcommand argv.
    pub fn current_exe(args: Vec<String>) -> Result<Self, SimError> {
        let program = std::env::current_exe()?;
        Ok(Self { program, args })
    }

    /// An external program (the visualizer hook).
    pub fn external(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn spawn(&self) -> std::io::Result<Child> {
        // stdin is the graceful stop signal: the child treats EOF on its
        // piped stdin as the cooperative stop.
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }
}

/// One managed process.
///
/// State machine: Starting -> Running -> {Exited -> Restarting -> Running
/// | Terminated}.
pub struct AgentHandle {
    name: String,
    role: ManagedRole,
    spec: RespawnSpec,
    child: Child,
    stdin: Option<ChildStdin>,
    state: AgentState,
    restarts: u32,
    last_exit: Option<ExitStatus>,
}

impl AgentHandle {
    /// Spawn the process described by `spec`.
    pub fn spawn(
        name: impl Into<String>,
        role: ManagedRole,
        spec: RespawnSpec,
    ) -> Result<Self, SimError> {
        let name = name.into();
        let mut child = spec
            .spawn()
            .map_err(|e| SimError::spawn(&name, e.to_string()))?;
        let stdin = child.stdin.take();

        debug!(agent = %name, role = role.as_str(), pid = ?child.id(), "agent spawned");

        Ok(Self {
            name,
            role,
            spec,
            child,
            stdin,
            state: AgentState::Starting,
            restarts: 0,
            last_exit: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> ManagedRole {
        self.role
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn last_exit(&self) -> Option<ExitStatus> {
        self.last_exit
    }

    pub fn spec(&self) -> &RespawnSpec {
        &self.spec
    }

    /// Non-blocking liveness check.
    ///
    /// A live process confirms Starting -> Running; an exit is returned
    /// exactly once (-> Exited), so the caller logs each exit a single
    /// time.
    pub fn poll_exit(&mut self) -> Option<ExitStatus> {
        if !matches!(self.state, AgentState::Starting | AgentState::Running) {
            return None;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.state = AgentState::Exited;
                self.last_exit = Some(status);
                Some(status)
            }
            Ok(None) => {
                self.state = AgentState::Running;
                None
            }
            Err(e) => {
                warn!(agent = %self.name, error = %e, "liveness poll failed");
                None
            }
        }
    }

    /// Relaunch with the original construction parameters.
    pub fn respawn(&mut self) -> Result<(), SimError> {
        self.state = AgentState::Restarting;
        let mut child = self
            .spec
            .spawn()
            .map_err(|e| SimError::spawn(&self.name, e.to_string()))?;
        self.stdin = child.stdin.take();
        self.child = child;
        self.state = AgentState::Running;
        self.restarts += 1;

        debug!(
            agent = %self.name,
            restarts = self.restarts,
            pid = ?self.child.id(),
            "agent respawned"
        );
        Ok(())
    }

    /// Phase 1 of shutdown: close the stdin pipe. The child observes EOF at
    /// its next select point and stops cooperatively. Idempotent.
    pub fn close_stdin(&mut self) {
        self.stdin.take();
    }

    /// Phase 2 of shutdown: force-kill if still alive. Idempotent; an
    /// already-exited child is only marked Terminated.
    pub async fn force_kill(&mut self) {
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                if let Err(e) = self.child.kill().await {
                    error!(agent = %self.name, error = %e, "force kill failed");
                }
            }
        }
        self.state = AgentState::Terminated;
    }

    /// Record a terminal state without touching the process (used for
    /// expected exits).
    pub fn mark_terminated(&mut self) {
        self.state = AgentState::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn shell(cmd: &str) -> RespawnSpec {
        RespawnSpec::external("/bin/sh", vec!["-c".into(), cmd.into()])
    }

    async fn poll_until_exit(agent: &mut AgentHandle) -> ExitStatus {
        for _ in 0..100 {
            if let Some(status) = agent.poll_exit() {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("agent did not exit in time");
    }

    #[tokio::test]
    async fn detects_exit_with_code() {
        let mut agent = AgentHandle::spawn("crasher", ManagedRole::Sensor, shell("exit 3"))
            .expect("spawn");

        let status = poll_until_exit(&mut agent).await;
        assert_eq!(status.code(), Some(3));
        assert_eq!(agent.state(), AgentState::Exited);

        // Exit is reported exactly once
        assert!(agent.poll_exit().is_none());
    }

    #[tokio::test]
    async fn respawn_reuses_original_parameters() {
        let mut agent = AgentHandle::spawn("crasher", ManagedRole::Sensor, shell("exit 1"))
            .expect("spawn");
        let original_args = agent.spec().args().to_vec();

        poll_until_exit(&mut agent).await;
        agent.respawn().expect("respawn");

        assert_eq!(agent.state(), AgentState::Running);
        assert_eq!(agent.restarts(), 1);
        assert_eq!(agent.spec().args(), original_args.as_slice());

        poll_until_exit(&mut agent).await;
    }

    #[tokio::test]
    async fn stdin_eof_stops_a_cooperative_child() {
        // `read x` blocks until stdin reaches EOF, then sh exits
        let mut agent = AgentHandle::spawn("reader", ManagedRole::Sensor, shell("read x"))
            .expect("spawn");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(agent.poll_exit().is_none(), "child should still be alive");

        agent.close_stdin();
        poll_until_exit(&mut agent).await;
    }

    #[tokio::test]
    async fn force_kill_stops_a_stubborn_child() {
        let mut agent = AgentHandle::spawn("sleeper", ManagedRole::Sensor, shell("sleep 600"))
            .expect("spawn");

        agent.force_kill().await;
        assert_eq!(agent.state(), AgentState::Terminated);
    }

    #[tokio::test]
    async fn force_kill_is_idempotent_after_exit() {
        let mut agent = AgentHandle::spawn("done", ManagedRole::Emitter, shell("exit 0"))
            .expect("spawn");

        poll_until_exit(&mut agent).await;
        agent.force_kill().await;
        assert_eq!(agent.state(), AgentState::Terminated);
    }
}
