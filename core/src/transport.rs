//! Blocking `reqwest` transport.

use std::io::{ErrorKind, Read, Write};

use reqwest::blocking::{multipart, Client, RequestBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};

/// Default transport used by `Client::new`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client, e.g. one with timeouts or a proxy.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn prepare(&self, request: HttpRequest) -> RequestBuilder {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart { fields, files } => {
                let mut form = multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for file in files {
                    let part = multipart::Part::bytes(file.contents).file_name(file.file_name);
                    form = form.part(file.field, part);
                }
                builder.multipart(form)
            }
        }
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

/// Copy `body` into `sink`. Read failures are the connection's fault and
/// become `Error::Transport`; write failures stay `Error::Io`.
pub(crate) fn copy_body(body: &mut dyn Read, sink: &mut dyn Write) -> Result<u64> {
    let mut buf = [0u8; 8192];
    let mut copied = 0u64;
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                return Err(Error::Transport(format!(
                    "body read failed after {copied} bytes: {err}"
                )))
            }
        };
        sink.write_all(&buf[..n])?;
        copied += n as u64;
    }
    sink.flush()?;
    Ok(copied)
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.prepare(request).send().map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(transport_error)?.to_vec();
        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }

    fn download(&self, request: HttpRequest, sink: &mut dyn Write) -> Result<u64> {
        let mut response = self
            .prepare(request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?;
        let copied = copy_body(&mut response, sink)?;
        debug!(copied, "downloaded export");
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Yields `data`, then fails as a dropped connection would.
    struct Truncated<'a> {
        data: &'a [u8],
    }

    impl Read for Truncated<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(ErrorKind::ConnectionReset, "reset by peer"));
            }
            let n = self.data.read(buf)?;
            Ok(n)
        }
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn copy_body_copies_everything() {
        let mut sink = Vec::new();
        let copied = copy_body(&mut &b"msgid \"a\""[..], &mut sink).unwrap();
        assert_eq!(copied, 9);
        assert_eq!(sink, b"msgid \"a\"");
    }

    #[test]
    fn dropped_connection_is_transport_error() {
        let mut sink = Vec::new();
        let err = copy_body(&mut Truncated { data: b"partial" }, &mut sink).unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "got {err:?}");
        assert_eq!(sink, b"partial");
    }

    #[test]
    fn sink_failure_is_io_error() {
        let err = copy_body(&mut &b"data"[..], &mut FullDisk).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got {err:?}");
    }
}
