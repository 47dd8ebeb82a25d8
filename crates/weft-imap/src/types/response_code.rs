//! Response codes carried in `[...]` bracket sections of status responses.

use super::{Capability, Flags, Uid, UidValidity};

/// Response code from a status response (RFC 9051 §7.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// ALERT: human-readable message that MUST be shown to the user.
    Alert,
    /// PARSE: error parsing a message's headers.
    Parse,
    /// READ-ONLY: mailbox selected read-only.
    ReadOnly,
    /// READ-WRITE: mailbox selected read-write.
    ReadWrite,
    /// TRYCREATE: target mailbox doesn't exist but may be created.
    TryCreate,
    /// UIDNOTSTICKY: mailbox does not support persistent UIDs.
    UidNotSticky,
    /// CLOSED: previously selected mailbox is now closed.
    Closed,
    /// AUTHENTICATIONFAILED: credentials rejected.
    AuthenticationFailed,
    /// AUTHORIZATIONFAILED: authentication ok, authorization denied.
    AuthorizationFailed,
    /// EXPIRED: credentials have expired.
    Expired,
    /// PRIVACYREQUIRED: operation needs a protected connection.
    PrivacyRequired,
    /// CONTACTADMIN: user should contact the administrator.
    ContactAdmin,
    /// NOPERM: access denied.
    NoPerm,
    /// INUSE: mailbox is in use by another session.
    InUse,
    /// EXPUNGEISSUED: an expunge happened under a pipelined command.
    ExpungeIssued,
    /// OVERQUOTA: quota exceeded.
    OverQuota,
    /// ALREADYEXISTS: mailbox already exists.
    AlreadyExists,
    /// NONEXISTENT: mailbox does not exist.
    NonExistent,
    /// UNAVAILABLE: temporary server-side failure.
    Unavailable,
    /// SERVERBUG: internal server error.
    ServerBug,
    /// CLIENTBUG: the client did something documented as wrong.
    ClientBug,
    /// CANNOT: operation violates some server policy.
    Cannot,
    /// LIMIT: a server limit was exceeded.
    Limit,
    /// CORRUPTION: server-side data corruption.
    Corruption,
    /// HASCHILDREN: mailbox has children and cannot be deleted.
    HasChildren,
    /// NOTSAVED: SAVEDATE is not available.
    NotSaved,
    /// UNKNOWN-CTE: server cannot decode the content transfer encoding.
    UnknownCte,
    /// CAPABILITY: capability list embedded in the response.
    Capability(Vec<Capability>),
    /// PERMANENTFLAGS: flags that can be changed permanently.
    PermanentFlags(Flags),
    /// UIDNEXT: next UID to be assigned.
    UidNext(Uid),
    /// UIDVALIDITY: unique identifier validity value.
    UidValidity(UidValidity),
    /// APPENDUID: UID assigned to an appended message (RFC 4315).
    AppendUid {
        /// UIDVALIDITY of the destination mailbox.
        uid_validity: UidValidity,
        /// UID of the appended message.
        uid: Uid,
    },
    /// COPYUID: UID mapping for copied messages (RFC 4315).
    CopyUid {
        /// UIDVALIDITY of the destination mailbox.
        uid_validity: UidValidity,
        /// Source UID set, in its wire form.
        source: String,
        /// Destination UID set, in its wire form.
        dest: String,
    },
    /// Anything else: normalized name plus the remaining text, if any.
    Other {
        /// Lowercased code name with `-` mapped to `_`.
        name: String,
        /// Remaining bracket content joined by spaces.
        data: Option<String>,
    },
}

impl ResponseCode {
    /// Looks up a parameterless code by its atom, case-insensitively.
    #[must_use]
    pub fn from_atom(atom: &str) -> Option<Self> {
        let code = match atom.to_ascii_uppercase().as_str() {
            "ALERT" => Self::Alert,
            "PARSE" => Self::Parse,
            "READ-ONLY" => Self::ReadOnly,
            "READ-WRITE" => Self::ReadWrite,
            "TRYCREATE" => Self::TryCreate,
            "UIDNOTSTICKY" => Self::UidNotSticky,
            "CLOSED" => Self::Closed,
            "AUTHENTICATIONFAILED" => Self::AuthenticationFailed,
            "AUTHORIZATIONFAILED" => Self::AuthorizationFailed,
            "EXPIRED" => Self::Expired,
            "PRIVACYREQUIRED" => Self::PrivacyRequired,
            "CONTACTADMIN" => Self::ContactAdmin,
            "NOPERM" => Self::NoPerm,
            "INUSE" => Self::InUse,
            "EXPUNGEISSUED" => Self::ExpungeIssued,
            "OVERQUOTA" => Self::OverQuota,
            "ALREADYEXISTS" => Self::AlreadyExists,
            "NONEXISTENT" => Self::NonExistent,
            "UNAVAILABLE" => Self::Unavailable,
            "SERVERBUG" => Self::ServerBug,
            "CLIENTBUG" => Self::ClientBug,
            "CANNOT" => Self::Cannot,
            "LIMIT" => Self::Limit,
            "CORRUPTION" => Self::Corruption,
            "HASCHILDREN" => Self::HasChildren,
            "NOTSAVED" => Self::NotSaved,
            "UNKNOWN-CTE" => Self::UnknownCte,
            _ => return None,
        };
        Some(code)
    }
}
