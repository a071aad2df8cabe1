use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

/// Identity under which magpie's content is installed in the host.
pub const INJECTION_IDENTITY: &str = "magpie";

/// Where the host should place installed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPosition {
    /// Inside the conversation history, `depth` turns before the latest
    InHistory,
    /// Nowhere; removes any content previously installed under the identity
    None,
}

/// The prompt-construction surface of the host application.
///
/// The host is an opaque collaborator; this trait is the only thing magpie
/// knows about it.
pub trait PromptHost {
    fn set_prompt(&mut self, identity: &str, text: &str, position: PromptPosition, depth: u32);
}

/// Install or retract the assembled block.
///
/// Called after every state mutation that could affect the assembled result;
/// an empty block installs an empty payload at depth 0, which the host
/// interprets as "remove anything previously installed under this identity".
pub fn refresh(host: &mut dyn PromptHost, assembled: &str, depth: u32) {
    if assembled.is_empty() {
        debug!("retracting injected block");
        host.set_prompt(INJECTION_IDENTITY, "", PromptPosition::None, 0);
    } else {
        debug!(bytes = assembled.len(), depth, "installing injected block");
        host.set_prompt(INJECTION_IDENTITY, assembled, PromptPosition::InHistory, depth);
    }
}

/// One recorded `set_prompt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPrompt {
    pub identity: String,
    pub text: String,
    pub position: PromptPosition,
    pub depth: u32,
}

/// In-process host that records every installation.
///
/// Clones share the same log, so the panel (and tests) can hand one clone to
/// the engine and keep another to observe what was installed.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    installed: Rc<RefCell<Vec<InstalledPrompt>>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent installation, if any
    pub fn current(&self) -> Option<InstalledPrompt> {
        self.installed.borrow().last().cloned()
    }

    /// Every installation, in order
    pub fn log(&self) -> Vec<InstalledPrompt> {
        self.installed.borrow().clone()
    }
}

impl PromptHost for MemoryHost {
    fn set_prompt(&mut self, identity: &str, text: &str, position: PromptPosition, depth: u32) {
        self.installed.borrow_mut().push(InstalledPrompt {
            identity: identity.to_string(),
            text: text.to_string(),
            position,
            depth,
        });
    }
}
