//! Dialable peer targets and resolution of a peer's identity from its address.

use std::{error::Error as StdError, fmt, str::FromStr};

use async_trait::async_trait;
use multiaddr::Multiaddr;
use tracing::debug;

use crate::errors::ResolveError;

const P2P_COMPONENT: &str = "/p2p/";

/// Identity deliberately offered to a peer so that its handshake fails.
pub const MISMATCH_IDENTITY: &str = "16Uiu2HAmSifdT5QutTsaET8xqjWAMPp4obrQv7LN79f2RMmBe3nY";

/// Text that precedes the real remote identity in a failed handshake.
const REMOTE_KEY_MARKER: &str = "but remote key matches";

/// Opaque cryptographic identity of a peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerIdentity(String);

impl PeerIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transport address paired with the identity expected at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerTarget {
    pub address: Multiaddr,
    pub identity: PeerIdentity,
}

impl PeerTarget {
    pub const fn new(address: Multiaddr, identity: PeerIdentity) -> Self {
        Self { address, identity }
    }

    /// Splits an address ending in `/p2p/<id>`.
    ///
    /// Returns `Ok(None)` if the address carries no identity.
    pub fn split_address(address: &str) -> Result<Option<Self>, ResolveError> {
        match address.rsplit_once(P2P_COMPONENT) {
            Some((transport, identity)) if !identity.is_empty() && !identity.contains('/') => {
                let address = parse_address(transport)?;
                Ok(Some(Self::new(address, PeerIdentity::new(identity))))
            }
            Some(_) => Err(invalid_address(address, "malformed /p2p component")),
            None => Ok(None),
        }
    }
}

impl fmt::Display for PeerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{P2P_COMPONENT}{}", self.address, self.identity)
    }
}

/// Finds the identity of the peer listening at an address.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_identity(&self, address: &Multiaddr) -> Result<PeerIdentity, ResolveError>;
}

/// Performs a secure-channel handshake that authenticates the remote peer.
#[async_trait]
pub trait SecureDialer: Send + Sync {
    async fn dial(
        &self,
        address: &Multiaddr,
        expected: &PeerIdentity,
    ) -> Result<(), Box<dyn StdError + Send + Sync>>;
}

/// Learns a peer's identity by dialing it with a wrong one and reading the
/// real identity back out of the handshake failure.
///
/// This depends on the exact error text of one handshake implementation and
/// is only suitable for development networks.
#[derive(Debug, Clone)]
pub struct HandshakeMismatchResolver<D> {
    dialer: D,
}

impl<D> HandshakeMismatchResolver<D> {
    pub const fn new(dialer: D) -> Self {
        Self { dialer }
    }
}

#[async_trait]
impl<D: SecureDialer> IdentityResolver for HandshakeMismatchResolver<D> {
    async fn resolve_identity(&self, address: &Multiaddr) -> Result<PeerIdentity, ResolveError> {
        let decoy = PeerIdentity::new(MISMATCH_IDENTITY);
        match self.dialer.dial(address, &decoy).await {
            Ok(()) => Err(ResolveError::UnexpectedHandshakeSuccess),
            Err(err) => {
                let message = error_chain(err.as_ref());
                debug!(%address, %message, "handshake with mismatched identity failed");
                causes(err.as_ref())
                    .find_map(|cause| remote_identity_from_error(&cause.to_string()))
                    .ok_or_else(|| ResolveError::Handshake(message))
            }
        }
    }
}

/// Extracts the identity from a "... but remote key matches <id>" message.
///
/// The identity is the word right after the marker, without trailing
/// punctuation.
pub fn remote_identity_from_error(message: &str) -> Option<PeerIdentity> {
    let (_, rest) = message.split_once(REMOTE_KEY_MARKER)?;
    let identity = rest
        .split_whitespace()
        .next()?
        .trim_end_matches(|c: char| c.is_ascii_punctuation());
    (!identity.is_empty()).then(|| PeerIdentity::new(identity))
}

/// Turns `address` into a target, asking `resolver` only when the address has
/// no `/p2p/<id>` suffix.
pub async fn resolve_target<R>(resolver: &R, address: &str) -> Result<PeerTarget, ResolveError>
where
    R: IdentityResolver + ?Sized,
{
    if let Some(target) = PeerTarget::split_address(address)? {
        return Ok(target);
    }
    let address = parse_address(address)?;
    let identity = resolver.resolve_identity(&address).await?;
    debug!(%address, %identity, "resolved peer identity");
    Ok(PeerTarget::new(address, identity))
}

fn parse_address(address: &str) -> Result<Multiaddr, ResolveError> {
    Multiaddr::from_str(address).map_err(|err| invalid_address(address, err))
}

fn invalid_address(address: &str, reason: impl fmt::Display) -> ResolveError {
    ResolveError::InvalidAddress {
        address: address.to_owned(),
        reason: reason.to_string(),
    }
}

/// An error followed by its sources, outermost first.
fn causes<'a>(
    err: &'a (dyn StdError + Send + Sync + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    let outer: &'a (dyn StdError + 'static) = err;
    std::iter::successors(Some(outer), |&cause: &&'a (dyn StdError + 'static)| cause.source())
}

// Joins the messages of an error and its sources, outermost first.
fn error_chain(err: &(dyn StdError + Send + Sync + 'static)) -> String {
    causes(err)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Mutex};

    use futures::executor::block_on;

    use super::*;

    struct ScriptedDialer {
        outcome: Result<(), String>,
        dialed: Mutex<Vec<PeerIdentity>>,
    }

    impl ScriptedDialer {
        fn new(outcome: Result<(), &str>) -> Self {
            Self {
                outcome: outcome.map_err(str::to_owned),
                dialed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SecureDialer for ScriptedDialer {
        async fn dial(
            &self,
            _address: &Multiaddr,
            expected: &PeerIdentity,
        ) -> Result<(), Box<dyn StdError + Send + Sync>> {
            self.dialed.lock().unwrap().push(expected.clone());
            self.outcome.clone().map_err(Into::into)
        }
    }

    struct PanickingResolver;

    #[async_trait]
    impl IdentityResolver for PanickingResolver {
        async fn resolve_identity(&self, _: &Multiaddr) -> Result<PeerIdentity, ResolveError> {
            panic!("resolver must not be consulted");
        }
    }

    #[test]
    fn extracts_identity_from_mismatch_message() {
        let message = "failed to negotiate security protocol: peer id mismatch: expected \
                       16Uiu2HAmSifdT5QutTsaET8xqjWAMPp4obrQv7LN79f2RMmBe3nY, but remote key matches ABCDEF";
        assert_eq!(
            remote_identity_from_error(message),
            Some(PeerIdentity::new("ABCDEF"))
        );
        assert_eq!(remote_identity_from_error("connection refused"), None);
    }

    #[derive(Debug)]
    struct UpgradeError {
        source: io::Error,
    }

    impl fmt::Display for UpgradeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(
                "peer id mismatch: expected 16Uiu2HAmSifdT5QutTsaET8xqjWAMPp4obrQv7LN79f2RMmBe3nY, \
                 but remote key matches ABCDEF",
            )
        }
    }

    impl StdError for UpgradeError {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.source)
        }
    }

    struct SourcedErrorDialer;

    #[async_trait]
    impl SecureDialer for SourcedErrorDialer {
        async fn dial(
            &self,
            _address: &Multiaddr,
            _expected: &PeerIdentity,
        ) -> Result<(), Box<dyn StdError + Send + Sync>> {
            Err(Box::new(UpgradeError {
                source: io::Error::new(io::ErrorKind::ConnectionAborted, "connection closed"),
            }))
        }
    }

    #[test]
    fn identity_is_not_taken_from_a_later_source() {
        let resolver = HandshakeMismatchResolver::new(SourcedErrorDialer);
        let address: Multiaddr = "/ip4/127.0.0.1/tcp/13000".parse().unwrap();

        let identity = block_on(resolver.resolve_identity(&address)).unwrap();
        assert_eq!(identity.as_str(), "ABCDEF");
    }

    #[test]
    fn identity_is_found_in_a_nested_source() {
        let err = io::Error::other(UpgradeError {
            source: io::Error::new(io::ErrorKind::ConnectionAborted, "connection closed"),
        });
        let found = causes(&err).find_map(|cause| remote_identity_from_error(&cause.to_string()));
        assert_eq!(found, Some(PeerIdentity::new("ABCDEF")));
        assert_eq!(
            error_chain(&err),
            "peer id mismatch: expected 16Uiu2HAmSifdT5QutTsaET8xqjWAMPp4obrQv7LN79f2RMmBe3nY, \
             but remote key matches ABCDEF: connection closed"
        );
    }

    #[test]
    fn trailing_text_after_the_identity_is_ignored() {
        assert_eq!(
            remote_identity_from_error("but remote key matches ABCDEF."),
            Some(PeerIdentity::new("ABCDEF"))
        );
        assert_eq!(
            remote_identity_from_error("but remote key matches ABCDEF; retrying later"),
            Some(PeerIdentity::new("ABCDEF"))
        );
        assert_eq!(remote_identity_from_error("but remote key matches "), None);
    }

    #[test]
    fn resolver_dials_with_mismatched_identity() {
        let dialer = ScriptedDialer::new(Err("... but remote key matches ABCDEF"));
        let resolver = HandshakeMismatchResolver::new(dialer);
        let address: Multiaddr = "/ip4/127.0.0.1/tcp/13000".parse().unwrap();

        let identity = block_on(resolver.resolve_identity(&address)).unwrap();
        assert_eq!(identity.as_str(), "ABCDEF");
        assert_eq!(
            *resolver.dialer.dialed.lock().unwrap(),
            vec![PeerIdentity::new(MISMATCH_IDENTITY)]
        );
    }

    #[test]
    fn unexpected_success_is_an_error() {
        let resolver = HandshakeMismatchResolver::new(ScriptedDialer::new(Ok(())));
        let address: Multiaddr = "/ip4/127.0.0.1/tcp/13000".parse().unwrap();
        assert_eq!(
            block_on(resolver.resolve_identity(&address)),
            Err(ResolveError::UnexpectedHandshakeSuccess)
        );
    }

    #[test]
    fn other_failures_are_passed_through() {
        let resolver =
            HandshakeMismatchResolver::new(ScriptedDialer::new(Err("connection refused")));
        let address: Multiaddr = "/ip4/127.0.0.1/tcp/13000".parse().unwrap();
        assert_eq!(
            block_on(resolver.resolve_identity(&address)),
            Err(ResolveError::Handshake("connection refused".to_owned()))
        );
    }

    #[test]
    fn embedded_identity_skips_resolver() {
        let target =
            block_on(resolve_target(&PanickingResolver, "/ip4/10.0.0.1/tcp/9000/p2p/ABCDEF"))
                .unwrap();
        assert_eq!(target.address.to_string(), "/ip4/10.0.0.1/tcp/9000");
        assert_eq!(target.identity.as_str(), "ABCDEF");
        assert_eq!(target.to_string(), "/ip4/10.0.0.1/tcp/9000/p2p/ABCDEF");
    }

    #[test]
    fn missing_identity_is_resolved() {
        let resolver = HandshakeMismatchResolver::new(ScriptedDialer::new(Err(
            "handshake: but remote key matches XYZ",
        )));
        let target = block_on(resolve_target(&resolver, "/ip4/10.0.0.1/tcp/9000")).unwrap();
        assert_eq!(target.identity.as_str(), "XYZ");
    }

    #[test]
    fn invalid_addresses_are_rejected() {
        assert!(matches!(
            block_on(resolve_target(&PanickingResolver, "not an address")),
            Err(ResolveError::InvalidAddress { .. })
        ));
        assert!(matches!(
            block_on(resolve_target(&PanickingResolver, "/ip4/10.0.0.1/tcp/9000/p2p/")),
            Err(ResolveError::InvalidAddress { .. })
        ));
    }
}
