//! Chain roles.
//!
//! A role describes a command's behaviour at either end of a chain segment:
//!
//! - left end: *closed* commands accept no input, *receiving* ones need the
//!   previous command's result
//! - right end: *closed* commands produce nothing for a follow-up command,
//!   *producing* ones do
//!
//! The role fixes where in a chain of `n` segments a command may stand.

use std::fmt;

/// Where a command may appear in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Runs solo (`exit`, `help`)
    ClosedClosed,
    /// Starts a chain (`get`, `add`, `import`)
    ClosedProducing,
    /// Sits inside a chain after a producer (`tag`, `untag`)
    ReceivingProducing,
    /// Ends a chain after a producer (`show`, `open`, `export`, `delete`)
    ReceivingClosed,
}

impl Role {
    /// All roles in resolution order.
    pub const ALL: [Role; 4] = [
        Role::ClosedClosed,
        Role::ClosedProducing,
        Role::ReceivingProducing,
        Role::ReceivingClosed,
    ];

    /// Whether the command consumes the previous command's result.
    pub fn accepts_result(self) -> bool {
        matches!(self, Role::ReceivingProducing | Role::ReceivingClosed)
    }

    /// Whether the command hands a result to the next command.
    pub fn produces_result(self) -> bool {
        matches!(self, Role::ClosedProducing | Role::ReceivingProducing)
    }

    /// Whether a command of this role may stand at `index` in a chain of
    /// `len` segments.
    pub fn is_legal(self, index: usize, len: usize) -> bool {
        match self {
            Role::ClosedClosed => len == 1 && index == 0,
            Role::ClosedProducing => index == 0,
            Role::ReceivingProducing => index > 0,
            Role::ReceivingClosed => index > 0 && index + 1 == len,
        }
    }

    /// Whether a command of this role could start the segment at `index`
    /// of a chain whose total length is not known yet.
    pub fn may_appear_at(self, index: usize) -> bool {
        match self {
            Role::ClosedClosed | Role::ClosedProducing => index == 0,
            Role::ReceivingProducing | Role::ReceivingClosed => index > 0,
        }
    }

    /// The constraint a misplaced command violates.
    pub fn constraint(self) -> &'static str {
        match self {
            Role::ClosedClosed => "makes sense only as a solo-command",
            Role::ClosedProducing => "makes sense only as the first command of a chain",
            Role::ReceivingProducing => "makes sense only as a follow-up command",
            Role::ReceivingClosed => "makes sense only as a terminal follow-up command",
        }
    }

    /// Kebab-case name, e.g. `closed-producing`.
    pub fn name(self) -> &'static str {
        match self {
            Role::ClosedClosed => "closed-closed",
            Role::ClosedProducing => "closed-producing",
            Role::ReceivingProducing => "receiving-producing",
            Role::ReceivingClosed => "receiving-closed",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
