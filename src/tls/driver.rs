use super::{
    classifier::Classification,
    verifier::{CertCapturingVerifier, Verdict},
};
use crate::error::{Error, Result};
use rustls::{ClientConfig, ClientConnection, RootCertStore, pki_types::ServerName};
use std::{io, sync::Arc};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const READ_CHUNK: usize = 16 * 1024;

/// What the event loop does next
#[derive(Debug)]
enum Step {
    /// The engine or the outbound queue has bytes for the peer
    Flush,
    /// Nothing to send, wait for the peer
    Receive,
    /// The verifier settled the verdict
    Done(Classification),
}

/// One TLS handshake over one transport, driven until the peer's
/// certificate chain has been classified.
///
/// The rustls engine never touches the transport: bytes travel through an
/// outbound queue (engine to peer) and an inbound queue (peer to engine).
pub struct Session {
    host: String,
    port: u16,
    engine: ClientConnection,
    verdict: Verdict,
    outbound: Vec<u8>,
    inbound: Vec<u8>,
}

impl Session {
    /// Prepare a session for `host:port`; the ClientHello is queued right away
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not a usable server name or the TLS
    /// engine cannot be created
    pub fn new(host: &str, port: u16, root_store: RootCertStore) -> Result<Self> {
        let server_name = server_name_from_host(host)?;
        let verifier = CertCapturingVerifier::new(host, root_store)
            .map_err(|e| Error::Certificate(e.to_string()))?;
        let verdict = verifier.verdict();

        let config = ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth();
        let engine = ClientConnection::new(Arc::new(config), server_name)?;

        Ok(Self {
            host: host.to_string(),
            port,
            engine,
            verdict,
            outbound: Vec::new(),
            inbound: Vec::new(),
        })
    }

    /// Drive the handshake over `transport` and return the verdict
    ///
    /// The transport is shut down exactly once, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the peer hangs up before
    /// presenting a certificate, [`Error::Transport`] on I/O failures and
    /// [`Error::Handshake`] if the engine rejects the peer's messages
    pub async fn run<T>(mut self, mut transport: T) -> Result<Classification>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        debug!(host = %self.host, port = self.port, "starting TLS handshake");
        let result = self.pump(&mut transport).await;
        release(&mut transport, &self.host).await;
        result
    }

    async fn pump<T>(&mut self, transport: &mut T) -> Result<Classification>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        let mut buf = vec![0u8; READ_CHUNK];

        loop {
            match self.next_step() {
                Step::Done(classification) => return Ok(classification),
                Step::Flush => {
                    self.drain_engine()?;
                    debug!(bytes = self.outbound.len(), "writing TLS records");
                    transport
                        .write_all(&self.outbound)
                        .await
                        .map_err(|e| self.transport_error(e))?;
                    transport
                        .flush()
                        .await
                        .map_err(|e| self.transport_error(e))?;
                    self.outbound.clear();
                }
                Step::Receive => {
                    let n = transport
                        .read(&mut buf)
                        .await
                        .map_err(|e| self.transport_error(e))?;
                    if n == 0 {
                        return Err(Error::ConnectionClosed {
                            host: self.host.clone(),
                            port: self.port,
                        });
                    }
                    debug!(bytes = n, "passing data through");
                    self.inbound.extend_from_slice(buf.get(..n).unwrap_or_default());
                    self.feed_engine()?;
                }
            }
        }
    }

    fn next_step(&self) -> Step {
        if let Some(classification) = self.verdict.get() {
            return Step::Done(classification.clone());
        }

        if self.engine.wants_write() || !self.outbound.is_empty() {
            Step::Flush
        } else {
            Step::Receive
        }
    }

    /// Move pending TLS records from the engine to the outbound queue
    fn drain_engine(&mut self) -> Result<()> {
        while self.engine.wants_write() {
            self.engine
                .write_tls(&mut self.outbound)
                .map_err(engine_io_error)?;
        }
        Ok(())
    }

    /// Hand the inbound queue to the engine
    ///
    /// Engine failures after the verdict is settled are not reported: the
    /// chain has been seen and that is all the session is for.
    fn feed_engine(&mut self) -> Result<()> {
        while !self.inbound.is_empty() {
            let mut reader = self.inbound.as_slice();
            let consumed = self
                .engine
                .read_tls(&mut reader)
                .map_err(engine_io_error)?;
            self.inbound.drain(..consumed);

            if let Err(err) = self.engine.process_new_packets() {
                if self.verdict.get().is_some() {
                    debug!(error = %err, "engine failed after the verdict was settled");
                    return Ok(());
                }
                return Err(Error::Handshake(err));
            }

            if consumed == 0 {
                break;
            }
        }
        Ok(())
    }

    fn transport_error(&self, source: io::Error) -> Error {
        Error::Transport {
            host: self.host.clone(),
            port: self.port,
            source,
        }
    }
}

async fn release<T>(transport: &mut T, host: &str)
where
    T: AsyncWrite + Unpin,
{
    if let Err(err) = transport.shutdown().await {
        debug!(host, error = %err, "transport shutdown failed");
    }
}

fn engine_io_error(err: io::Error) -> Error {
    Error::Handshake(rustls::Error::General(err.to_string()))
}

/// Build the TLS server name for `host`, which may be an IP address
///
/// # Errors
///
/// Returns an error if `host` is neither an IP address nor a valid DNS name
pub fn server_name_from_host(host: &str) -> Result<ServerName<'static>> {
    ServerName::try_from(host.to_string()).map_err(|_| Error::InvalidServerName(host.to_string()))
}
