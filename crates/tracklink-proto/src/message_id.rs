//! Message identifiers.
//!
//! The 16-bit message ID in the frame header selects the payload codec. The
//! reserved span is rejected; any ID inside the vendor-specific span is
//! accepted for routing even when no codec exists for it.

use serde::{Deserialize, Serialize};

/// Lower bound of the vendor-specific message ID span.
pub const VENDOR_SPECIFIC_LOW: u16 = 0xA100;
/// Upper bound of the vendor-specific message ID span.
pub const VENDOR_SPECIFIC_HIGH: u16 = 0xA2FF;

/// Known message identifiers.
///
/// Variants without a codec in this crate (`Monr2`, `Sowm`, `Info`, `Treo`,
/// `Cata`, `Rccm`, `Rcrt`, `Pime`, `Cose`, `Moma`) are still recognised by
/// [`crate::Codec::classify_frame`] so callers can route or skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageId {
    /// Object settings (origin, time, accuracy requirements)
    Osem,
    /// Object state change request
    Ostm,
    /// Start of scenario
    Strt,
    /// Control-centre heartbeat
    Heab,
    /// Object monitor report
    Monr,
    /// Extended object monitor report
    Monr2,
    /// Start of waypoint message
    Sowm,
    /// Info message
    Info,
    /// Synchronisation point configuration
    Sypm,
    /// Estimated time to synchronisation point
    Mtsp,
    /// Trigger configuration
    Trcm,
    /// Action configuration
    Accm,
    /// Trigger event occurred
    Treo,
    /// Remote control manoeuvre
    Rcmm,
    /// Execute action
    Exac,
    /// Catalogue message
    Cata,
    /// Remote control control message
    Rccm,
    /// Remote control response
    Rcrt,
    /// Path intersection message
    Pime,
    /// Communication security message
    Cose,
    /// Motion management message
    Moma,
    /// Trajectory transfer
    Traj,
    /// Object properties (vendor specific)
    Opro,
    /// Foreign object properties (vendor specific)
    Fopr,
    /// Supervisor mode command (vendor specific)
    Insup,
    /// Peer object data injection (vendor specific)
    Podi,
    /// General data request (vendor specific)
    Gdrm,
    /// Direct control transmitter IDs (vendor specific)
    Dcti,
    /// Request direct control action (vendor specific)
    Rdca,
    /// General response message (vendor specific)
    Grem,
    /// Direct control manoeuvre (vendor specific)
    Dcmm,
    /// Unassigned ID inside the vendor-specific span
    VendorOther(u16),
}

impl MessageId {
    /// Wire representation of this message ID.
    pub fn to_u16(self) -> u16 {
        match self {
            Self::Osem => 0x0001,
            Self::Ostm => 0x0003,
            Self::Strt => 0x0004,
            Self::Heab => 0x0005,
            Self::Monr => 0x0006,
            Self::Monr2 => 0x0007,
            Self::Sowm => 0x0008,
            Self::Info => 0x0009,
            Self::Sypm => 0x000B,
            Self::Mtsp => 0x000C,
            Self::Trcm => 0x0011,
            Self::Accm => 0x0012,
            Self::Treo => 0x0013,
            Self::Rcmm => 0x0014,
            Self::Exac => 0x0015,
            Self::Cata => 0x0016,
            Self::Rccm => 0x0020,
            Self::Rcrt => 0x0021,
            Self::Pime => 0x0030,
            Self::Cose => 0x0031,
            Self::Moma => 0x0032,
            Self::Traj => 0x0040,
            Self::Opro => 0xA100,
            Self::Fopr => 0xA101,
            Self::Insup => 0xA102,
            Self::Podi => 0xA103,
            Self::Gdrm => 0xA104,
            Self::Dcti => 0xA105,
            Self::Rdca => 0xA106,
            Self::Grem => 0xA107,
            Self::Dcmm => 0xA110,
            Self::VendorOther(id) => id,
        }
    }

    /// Map a wire message ID to a known identifier. Returns `None` for the
    /// reserved range.
    pub fn from_u16(id: u16) -> Option<Self> {
        let known = match id {
            0x0001 => Self::Osem,
            0x0003 => Self::Ostm,
            0x0004 => Self::Strt,
            0x0005 => Self::Heab,
            0x0006 => Self::Monr,
            0x0007 => Self::Monr2,
            0x0008 => Self::Sowm,
            0x0009 => Self::Info,
            0x000B => Self::Sypm,
            0x000C => Self::Mtsp,
            0x0011 => Self::Trcm,
            0x0012 => Self::Accm,
            0x0013 => Self::Treo,
            0x0014 => Self::Rcmm,
            0x0015 => Self::Exac,
            0x0016 => Self::Cata,
            0x0020 => Self::Rccm,
            0x0021 => Self::Rcrt,
            0x0030 => Self::Pime,
            0x0031 => Self::Cose,
            0x0032 => Self::Moma,
            0x0040 => Self::Traj,
            0xA100 => Self::Opro,
            0xA101 => Self::Fopr,
            0xA102 => Self::Insup,
            0xA103 => Self::Podi,
            0xA104 => Self::Gdrm,
            0xA105 => Self::Dcti,
            0xA106 => Self::Rdca,
            0xA107 => Self::Grem,
            0xA110 => Self::Dcmm,
            id if (VENDOR_SPECIFIC_LOW..=VENDOR_SPECIFIC_HIGH).contains(&id) => {
                Self::VendorOther(id)
            }
            _ => return None,
        };
        Some(known)
    }
}
