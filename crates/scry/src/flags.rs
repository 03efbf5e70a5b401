// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Behavior flags for detection requests.
//!
//! Values mirror the classic magic(4) flag set so existing databases and
//! embedders can pass flags through unchanged. A [`Detector`] captures its
//! flags at construction; they are immutable afterward.
//!
//! [`Detector`]: crate::Detector

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bit set of detection options. Combine with `|`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags(u32);

impl Flags {
    /// No flags.
    pub const NONE: Flags = Flags(0x000000);
    /// Turn on engine debugging output.
    pub const DEBUG: Flags = Flags(0x000001);
    /// Follow symlinks.
    pub const SYMLINK: Flags = Flags(0x000002);
    /// Look at the contents of devices.
    pub const DEVICES: Flags = Flags(0x000008);
    /// Return the MIME type instead of a textual description.
    pub const MIME_TYPE: Flags = Flags(0x000010);
    /// Report every rule that matches, not just the first.
    pub const CONTINUE: Flags = Flags(0x000020);
    /// Check the database for consistency and print warnings.
    pub const CHECK: Flags = Flags(0x000040);
    /// Restore the target's access time after reading it.
    pub const PRESERVE_ATIME: Flags = Flags(0x000080);
    /// Don't translate unprintable characters in descriptions.
    pub const RAW: Flags = Flags(0x000100);
    /// Surface I/O and engine faults as errors instead of output text.
    pub const ERROR: Flags = Flags(0x000200);
    /// Return the MIME encoding.
    pub const MIME_ENCODING: Flags = Flags(0x000400);
    /// Return MIME type and encoding together.
    pub const MIME: Flags = Flags(Flags::MIME_TYPE.0 | Flags::MIME_ENCODING.0);
    /// Return the Apple creator and type.
    pub const APPLE: Flags = Flags(0x000800);
    /// Don't look inside compressed files.
    pub const NO_CHECK_COMPRESS: Flags = Flags(0x001000);
    /// Don't examine tar files.
    pub const NO_CHECK_TAR: Flags = Flags(0x002000);
    /// Don't consult database rules.
    pub const NO_CHECK_SOFT: Flags = Flags(0x004000);
    /// Don't check application type.
    pub const NO_CHECK_APPTYPE: Flags = Flags(0x008000);
    /// Don't examine ELF details.
    pub const NO_CHECK_ELF: Flags = Flags(0x010000);
    /// Don't check for plain-text files.
    pub const NO_CHECK_TEXT: Flags = Flags(0x020000);
    /// Don't examine compound document files.
    pub const NO_CHECK_CDF: Flags = Flags(0x040000);
    /// Don't check for known tokens inside text.
    pub const NO_CHECK_TOKENS: Flags = Flags(0x100000);
    /// Don't classify text encodings.
    pub const NO_CHECK_ENCODING: Flags = Flags(0x200000);

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bit value, as accepted by magic(4)-style engines.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Construct from a raw bit value.
    pub const fn from_bits(bits: u32) -> Flags {
        Flags(bits)
    }

    /// True when multi-match output is active: `CONTINUE` with `RAW` framing.
    pub(crate) const fn multi_match(self) -> bool {
        self.contains(Flags(Flags::CONTINUE.0 | Flags::RAW.0))
    }

    /// Flags as a detector captures them. `CONTINUE` forces `RAW` so the
    /// multi-match output keeps the byte-stable delimiter framing the
    /// decoder splits on.
    pub(crate) const fn normalized(self) -> Flags {
        if self.contains(Flags::CONTINUE) {
            Flags(self.0 | Flags::RAW.0)
        } else {
            self
        }
    }

    /// Flags handed to an engine open. Errors are always raised rather than
    /// folded into output text, and compression heuristics are skipped, no
    /// matter what the caller asked for.
    pub(crate) const fn for_open(self) -> Flags {
        Flags(self.0 | Flags::NO_CHECK_COMPRESS.0 | Flags::ERROR.0)
    }
}

impl Default for Flags {
    /// Follow symlinks on platforms that support them; empty elsewhere.
    fn default() -> Flags {
        if cfg!(windows) {
            Flags::NONE
        } else {
            Flags::SYMLINK
        }
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flags({:#x})", self.0)
    }
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
