//! In-memory stand-in for the ipset binary, used by unit tests.
//!
//! Mimics the exit statuses and messages of ipset v7 for the verbs this
//! crate issues. The whole namespace sits behind one mutex, so `swap` is
//! atomic to concurrent observers exactly as in the kernel.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::cmd_abstraction::{CommandExecutor, CommandOutput};
use crate::tool::IpsetTool;

const MISSING: &str = "ipset v7.19: The set with the given name does not exist\n";

const ALREADY_EXISTS: &str = "ipset v7.19: Set cannot be created: set with the same name already exists\n";

/// Creation options the kernel applies when `create` omits them.
const DEFAULT_OPTIONS: &[(&str, &str)] = &[
    ("family", "inet"),
    ("hashsize", "1024"),
    ("maxelem", "65536"),
    ("timeout", "0"),
];

#[derive(Debug, Clone)]
struct FakeSet {
    set_type: String,
    options: BTreeMap<String, String>,
    members: BTreeSet<String>,
}

impl FakeSet {
    fn new(set_type: &str, options: BTreeMap<String, String>) -> Self {
        Self {
            set_type: set_type.to_string(),
            options,
            members: BTreeSet::new(),
        }
    }
}

/// Key/value creation options from a `create` tail, defaults filled in.
fn create_options(rest: &[&str]) -> BTreeMap<String, String> {
    let mut options: BTreeMap<String, String> = DEFAULT_OPTIONS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let pairs: Vec<&str> = rest.iter().copied().filter(|a| *a != "-exist").collect();
    for pair in pairs.chunks(2) {
        if let [key, value] = pair {
            options.insert(key.to_string(), value.to_string());
        }
    }
    options
}

#[derive(Debug, Default)]
struct State {
    sets: HashMap<String, FakeSet>,
    in_use: HashSet<String>,
    calls: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct FakeIpset {
    state: Mutex<State>,
}

impl FakeIpset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tool handle backed by this fake.
    pub fn tool(self: &Arc<Self>) -> IpsetTool {
        IpsetTool::with_executor("/usr/sbin/ipset", self.clone())
    }

    /// Members of `name`, or None if the set does not exist.
    pub fn members(&self, name: &str) -> Option<Vec<String>> {
        let state = self.state.lock().unwrap();
        state.sets.get(name).map(|s| s.members.iter().cloned().collect())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.state.lock().unwrap().sets.contains_key(name)
    }

    /// Create a set directly with default options, bypassing the command surface.
    pub fn insert(&self, name: &str, set_type: &str, members: &[&str]) {
        self.insert_with(name, set_type, &[], members);
    }

    /// Like [`FakeIpset::insert`], with creation options given as
    /// `create` arguments, e.g. `&["maxelem", "1000"]`.
    pub fn insert_with(&self, name: &str, set_type: &str, options: &[&str], members: &[&str]) {
        let mut set = FakeSet::new(set_type, create_options(options));
        set.members = members.iter().map(|m| m.to_string()).collect();
        self.state.lock().unwrap().sets.insert(name.to_string(), set);
    }

    /// Make `destroy` of `name` fail as if a firewall rule referenced it.
    pub fn mark_in_use(&self, name: &str) {
        self.state.lock().unwrap().in_use.insert(name.to_string());
    }

    /// Every argument vector received so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Verbs received so far, in order.
    pub fn verbs(&self) -> Vec<String> {
        self.calls().into_iter().filter_map(|c| c.first().cloned()).collect()
    }
}

fn valid_entry(entry: &str) -> bool {
    let addr = entry.split_once('/').map(|(a, _)| a).unwrap_or(entry);
    addr.parse::<IpAddr>().is_ok()
}

fn syntax_error(entry: &str) -> CommandOutput {
    CommandOutput::failed(
        1,
        &format!("ipset v7.19: Syntax error: cannot parse {}: resolving to IPv4 address failed\n", entry),
    )
}

impl State {
    fn handle(&mut self, args: &[String]) -> CommandOutput {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["create", name, set_type, rest @ ..] => {
                let exist_ok = rest.contains(&"-exist");
                let options = create_options(rest);
                match self.sets.get(*name) {
                    // The kernel only accepts -exist for an identical definition
                    Some(existing) if exist_ok && existing.set_type == *set_type && existing.options == options => {
                        CommandOutput::ok("")
                    }
                    Some(_) => CommandOutput::failed(1, ALREADY_EXISTS),
                    None => {
                        self.sets.insert(name.to_string(), FakeSet::new(set_type, options));
                        CommandOutput::ok("")
                    }
                }
            }
            ["flush", name] => match self.sets.get_mut(*name) {
                Some(set) => {
                    set.members.clear();
                    CommandOutput::ok("")
                }
                None => CommandOutput::failed(1, MISSING),
            },
            ["add", name, entry, rest @ ..] => {
                let Some(set) = self.sets.get_mut(*name) else {
                    return CommandOutput::failed(1, MISSING);
                };
                if !valid_entry(entry) {
                    return syntax_error(entry);
                }
                if !set.members.insert(entry.to_string()) && !rest.contains(&"-exist") {
                    return CommandOutput::failed(
                        1,
                        "ipset v7.19: Element cannot be added to the set: it's already added\n",
                    );
                }
                CommandOutput::ok("")
            }
            ["del", name, entry, rest @ ..] => {
                let Some(set) = self.sets.get_mut(*name) else {
                    return CommandOutput::failed(1, MISSING);
                };
                if !valid_entry(entry) {
                    return syntax_error(entry);
                }
                if !set.members.remove(*entry) && !rest.contains(&"-exist") {
                    return CommandOutput::failed(
                        1,
                        "ipset v7.19: Element cannot be deleted from the set: it's not added\n",
                    );
                }
                CommandOutput::ok("")
            }
            ["test", name, entry] => {
                let Some(set) = self.sets.get(*name) else {
                    return CommandOutput::failed(1, MISSING);
                };
                if !valid_entry(entry) {
                    return syntax_error(entry);
                }
                if set.members.contains(*entry) {
                    CommandOutput {
                        stdout: String::new(),
                        stderr: format!("Warning: {} is in set {}.\n", entry, name),
                        success: true,
                        code: Some(0),
                    }
                } else {
                    CommandOutput::failed(1, &format!("{} is NOT in set {}.\n", entry, name))
                }
            }
            ["swap", a, b] => {
                let (Some(set_a), Some(set_b)) = (self.sets.get(*a), self.sets.get(*b)) else {
                    return CommandOutput::failed(1, MISSING);
                };
                if set_a.set_type != set_b.set_type {
                    return CommandOutput::failed(
                        1,
                        "ipset v7.19: The sets cannot be swapped: their type does not match\n",
                    );
                }
                let set_a = set_a.clone();
                let set_b = set_b.clone();
                self.sets.insert(a.to_string(), set_b);
                self.sets.insert(b.to_string(), set_a);
                CommandOutput::ok("")
            }
            ["destroy", name] => {
                if !self.sets.contains_key(*name) {
                    return CommandOutput::failed(1, MISSING);
                }
                if self.in_use.contains(*name) {
                    return CommandOutput::failed(
                        1,
                        "ipset v7.19: Set cannot be destroyed: it is in use by a kernel component\n",
                    );
                }
                self.sets.remove(*name);
                CommandOutput::ok("")
            }
            _ => CommandOutput::failed(2, "ipset v7.19: Unknown argument\n"),
        }
    }
}

impl CommandExecutor for FakeIpset {
    fn execute(&self, _cmd: &str, args: &[String]) -> Result<CommandOutput> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(args.to_vec());
        Ok(state.handle(args))
    }
}
