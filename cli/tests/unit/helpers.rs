//! Shared test helpers: a simulated illumos host and a recording reporter.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use kitchen_cli::application::ports::{CommandRunner, LocalFs, ProgressReporter};
use kitchen_cli::domain::{CommandError, Stage};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

fn output(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

// ── Simulated host ───────────────────────────────────────────────────────────

/// Everything the provisioner can change, in comparable form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostState {
    pub etherstubs: BTreeSet<String>,
    /// VNIC name → lower link.
    pub vnics: BTreeMap<String, String>,
    pub ip_interfaces: BTreeSet<String>,
    /// Address object → CIDR.
    pub addresses: BTreeMap<String, String>,
    pub forwarding: bool,
    /// FMRI → state.
    pub services: BTreeMap<String, String>,
    /// `fmri#property` → value.
    pub properties: BTreeMap<String, String>,
    pub configured_zones: BTreeSet<String>,
    pub installed_zones: BTreeSet<String>,
    pub files: BTreeMap<PathBuf, Vec<u8>>,
    pub dirs: BTreeSet<PathBuf>,
}

/// A stateful fake of the host tooling (`dladm`, `ipadm`, SMF, zones) and
/// filesystem, interpreting exactly the commands the provisioner issues.
pub struct SimulatedHost {
    state: RefCell<HostState>,
    /// Commands forced to fail with exit 1.
    failing: RefCell<HashSet<String>>,
    commands: RefCell<Vec<String>>,
    streamed: RefCell<Vec<String>>,
    writes: RefCell<Vec<PathBuf>>,
}

pub const IPFILTER: &str = "svc:/network/ipfilter:default";
pub const DHCP_SERVER: &str = "svc:/network/dhcp/server:ipv4";

impl SimulatedHost {
    /// A stock host: both services installed but disabled, a resolver file
    /// naming `example.com` and two name servers.
    pub fn new() -> Self {
        Self::with_resolv_conf("domain example.com\nnameserver 10.0.0.1\nnameserver 10.0.0.2\n")
    }

    pub fn with_resolv_conf(content: &str) -> Self {
        let mut state = HostState::default();
        state.services.insert(IPFILTER.into(), "disabled".into());
        state.services.insert(DHCP_SERVER.into(), "disabled".into());
        for dir in ["/etc", "/etc/ipf", "/etc/inet", "/root", "/zones"] {
            state.dirs.insert(PathBuf::from(dir));
        }
        state
            .files
            .insert(PathBuf::from("/etc/resolv.conf"), content.as_bytes().to_vec());
        Self {
            state: RefCell::new(state),
            failing: RefCell::new(HashSet::new()),
            commands: RefCell::new(Vec::new()),
            streamed: RefCell::new(Vec::new()),
            writes: RefCell::new(Vec::new()),
        }
    }

    /// Make `command` exit 1 without effect until `heal` is called.
    pub fn fail(&self, command: &str) {
        self.failing.borrow_mut().insert(command.to_string());
    }

    pub fn heal(&self) {
        self.failing.borrow_mut().clear();
    }

    pub fn snapshot(&self) -> HostState {
        self.state.borrow().clone()
    }

    pub fn state(&self) -> std::cell::Ref<'_, HostState> {
        self.state.borrow()
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.state
            .borrow()
            .files
            .get(Path::new(path))
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn put_file(&self, path: &str, content: &str) {
        self.state
            .borrow_mut()
            .files
            .insert(PathBuf::from(path), content.as_bytes().to_vec());
    }

    pub fn remove_file(&self, path: &str) {
        self.state.borrow_mut().files.remove(Path::new(path));
    }

    pub fn put_dir(&self, path: &str) {
        self.state.borrow_mut().dirs.insert(PathBuf::from(path));
    }

    /// Every command run (captured and streamed), in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn streamed(&self) -> Vec<String> {
        self.streamed.borrow().clone()
    }

    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.borrow().clone()
    }

    /// Forget recorded commands and writes, keeping host state.
    pub fn clear_log(&self) {
        self.commands.borrow_mut().clear();
        self.streamed.borrow_mut().clear();
        self.writes.borrow_mut().clear();
    }

    /// Commands that changed (or would change) host state.
    pub fn mutating_commands(&self) -> Vec<String> {
        const READ_ONLY: [&str; 5] = [
            "dladm show-",
            "ipadm show-",
            "svcs ",
            "svcprop ",
            "true",
        ];
        self.commands()
            .into_iter()
            .filter(|c| !READ_ONLY.iter().any(|p| c.starts_with(p)))
            .collect()
    }

    fn execute(&self, script: &str) -> Output {
        let mut stdout = String::new();
        for part in script.split(" && ") {
            if self.failing.borrow().contains(part.trim()) {
                return output(1, &stdout, &format!("{part}: simulated failure"));
            }
            match self.execute_one(part.trim()) {
                Ok(out) => stdout.push_str(&out),
                Err(msg) => return output(1, &stdout, &msg),
            }
        }
        output(0, &stdout, "")
    }

    #[allow(clippy::too_many_lines)]
    fn execute_one(&self, command: &str) -> Result<String, String> {
        let words: Vec<&str> = command.split_whitespace().collect();
        let mut st = self.state.borrow_mut();
        match words.as_slice() {
            ["dladm", "show-etherstub", name] => {
                if st.etherstubs.contains(*name) {
                    Ok(format!("{name}\n"))
                } else {
                    missing(name)
                }
            }
            ["dladm", "create-etherstub", name] => {
                if st.etherstubs.insert((*name).to_string()) {
                    Ok(String::new())
                } else {
                    Err("object already exists".into())
                }
            }
            ["dladm", "show-link", name] => {
                if st.vnics.contains_key(*name) || st.etherstubs.contains(*name) {
                    Ok(format!("{name}\n"))
                } else {
                    missing(name)
                }
            }
            ["dladm", "create-vnic", "-l", lower, name] => {
                if !st.etherstubs.contains(*lower) {
                    return missing(lower);
                }
                if st.vnics.contains_key(*name) {
                    return Err("object already exists".into());
                }
                st.vnics.insert((*name).to_string(), (*lower).to_string());
                Ok(String::new())
            }
            ["ipadm", "show-addr", name] => {
                let prefix = format!("{name}/");
                if st.addresses.keys().any(|k| k.starts_with(&prefix)) {
                    Ok(format!("{name}/v4\n"))
                } else {
                    missing(name)
                }
            }
            ["ipadm", "create-ip", name] => {
                if !st.vnics.contains_key(*name) {
                    return missing(name);
                }
                if st.ip_interfaces.insert((*name).to_string()) {
                    Ok(String::new())
                } else {
                    Err("interface already exists".into())
                }
            }
            ["ipadm", "create-addr", "-T", "static", "-a", cidr, object] => {
                let interface = object.split('/').next().unwrap_or_default();
                if !st.ip_interfaces.contains(interface) {
                    return missing(interface);
                }
                st.addresses.insert((*object).to_string(), (*cidr).to_string());
                Ok(String::new())
            }
            ["ipadm", "set-prop", "-p", "forwarding=on", "ipv4"] => {
                st.forwarding = true;
                Ok(String::new())
            }
            ["svcs", "-H", "-o", "state", fmri] => match st.services.get(*fmri) {
                Some(state) => Ok(format!("{state}\n")),
                None => missing(fmri),
            },
            ["svcadm", "enable", "-s", fmri] => match st.services.get_mut(*fmri) {
                Some(state) => {
                    *state = "online".into();
                    Ok(String::new())
                }
                None => missing(fmri),
            },
            ["svccfg", "-s", fmri, "setprop", property, "=", _type, value] => {
                st.properties
                    .insert(format!("{fmri}#{property}"), (*value).to_string());
                Ok(String::new())
            }
            ["svcadm", "refresh", fmri] => {
                if st.services.contains_key(*fmri) {
                    Ok(String::new())
                } else {
                    missing(fmri)
                }
            }
            ["svcprop", "-p", property, fmri] => st
                .properties
                .get(&format!("{fmri}#{property}"))
                .map(|v| format!("{v}\n"))
                .ok_or_else(|| format!("{property} not found")),
            ["zonecfg", "-z", zone, "-f", profile] => {
                if !st.files.contains_key(Path::new(profile)) {
                    return missing(profile);
                }
                st.configured_zones.insert((*zone).to_string());
                Ok(String::new())
            }
            ["zoneadm", "-z", zone, "install", "-c", manifest] => {
                if !st.configured_zones.contains(*zone) {
                    return missing(zone);
                }
                if !st.files.contains_key(Path::new(manifest)) {
                    return missing(manifest);
                }
                st.installed_zones.insert((*zone).to_string());
                st.dirs.insert(PathBuf::from("/zones").join(zone));
                Ok("Installation: Succeeded\n".into())
            }
            _ => Err(format!("{command}: command not found")),
        }
    }
}

impl CommandRunner for SimulatedHost {
    async fn run_shell(&self, script: &str) -> Result<Output, CommandError> {
        self.commands.borrow_mut().push(script.to_string());
        Ok(self.execute(script))
    }

    async fn run_shell_streaming(&self, script: &str) -> Result<Output, CommandError> {
        self.commands.borrow_mut().push(script.to_string());
        self.streamed.borrow_mut().push(script.to_string());
        Ok(self.execute(script))
    }
}

impl LocalFs for SimulatedHost {
    fn exists(&self, path: &Path) -> bool {
        let st = self.state.borrow();
        st.files.contains_key(path) || st.dirs.contains(path)
    }

    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        let st = self.state.borrow();
        if st.dirs.contains(path) {
            return Err(io::Error::other("Is a directory"));
        }
        Ok(st.files.get(path).cloned())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut st = self.state.borrow_mut();
        for ancestor in path.ancestors().filter(|a| a.parent().is_some()) {
            st.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn write_atomic(&self, path: &Path, content: &[u8], _mode: u32) -> io::Result<()> {
        let mut st = self.state.borrow_mut();
        let parent = path.parent().unwrap_or(Path::new("/"));
        if parent.parent().is_some() && !st.dirs.contains(parent) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        st.files.insert(path.to_path_buf(), content.to_vec());
        self.writes.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

fn missing(what: &str) -> Result<String, String> {
    Err(format!("{what} not found"))
}

// ── Recording reporter ───────────────────────────────────────────────────────

/// A `ProgressReporter` that records every event as a string.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| e.strip_prefix("stage: ").map(str::to_string))
            .collect()
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl ProgressReporter for RecordingReporter {
    fn stage(&self, stage: Stage) {
        self.push(format!("stage: {stage}"));
    }
    fn step(&self, message: &str) {
        self.push(format!("step: {message}"));
    }
    fn stream(&self, message: &str) {
        self.push(format!("stream: {message}"));
    }
    fn success(&self, message: &str) {
        self.push(format!("success: {message}"));
    }
    fn skipped(&self, message: &str) {
        self.push(format!("skipped: {message}"));
    }
}
