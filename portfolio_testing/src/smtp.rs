//! Minimal SMTP server that accepts (or rejects) every message without
//! delivering it.

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::mpsc,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceivedMail {
    pub from: String,
    pub recipients: Vec<String>,
    /// Raw message content without the terminating `.` line.
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SmtpBehavior {
    /// Accept every message.
    #[default]
    Accept,
    /// Reply to every `DATA` transaction with a permanent failure.
    Reject,
}

pub async fn start_server(host: IpAddr, port: u16, behavior: SmtpBehavior) -> anyhow::Result<()> {
    info!("Starting smtp testing server on {host}:{port} ({behavior:?})");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(mail) = rx.recv().await {
            let ReceivedMail {
                from,
                recipients,
                data,
            } = mail;
            info!(%from, ?recipients, "received mail\n{data}");
        }
    });

    serve(listener, behavior, tx).await
}

/// Starts a server on an ephemeral local port in the background.
///
/// Every accepted message is sent to the returned receiver.
pub async fn spawn_server(
    behavior: SmtpBehavior,
) -> anyhow::Result<(SocketAddr, mpsc::UnboundedReceiver<ReceivedMail>)> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(serve(listener, behavior, tx));
    Ok((addr, rx))
}

async fn serve(
    listener: TcpListener,
    behavior: SmtpBehavior,
    mails: mpsc::UnboundedSender<ReceivedMail>,
) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "accepted smtp connection");
        let mails = mails.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, behavior, mails).await {
                warn!(%peer, "smtp connection failed: {err}");
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    behavior: SmtpBehavior,
    mails: mpsc::UnboundedSender<ReceivedMail>,
) -> anyhow::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();
    let mut mail = ReceivedMail::default();

    write.write_all(b"220 localhost ESMTP testing\r\n").await?;

    while let Some(line) = lines.next_line().await? {
        let command = line.to_ascii_uppercase();
        let reply: &[u8] = if command.starts_with("EHLO") || command.starts_with("HELO") {
            b"250 localhost\r\n"
        } else if command.starts_with("MAIL FROM:") {
            mail = ReceivedMail {
                from: strip_path(&line["MAIL FROM:".len()..]),
                ..Default::default()
            };
            b"250 OK\r\n"
        } else if command.starts_with("RCPT TO:") {
            mail.recipients.push(strip_path(&line["RCPT TO:".len()..]));
            b"250 OK\r\n"
        } else if command == "DATA" {
            write
                .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                .await?;

            let mut data = Vec::new();
            while let Some(line) = lines.next_line().await? {
                if line == "." {
                    break;
                }
                data.push(line.strip_prefix('.').map(str::to_owned).unwrap_or(line));
            }

            match behavior {
                SmtpBehavior::Accept => {
                    mail.data = data.join("\n");
                    let _ = mails.send(std::mem::take(&mut mail));
                    b"250 OK\r\n"
                }
                SmtpBehavior::Reject => b"554 Transaction failed\r\n",
            }
        } else if command == "RSET" {
            mail = ReceivedMail::default();
            b"250 OK\r\n"
        } else if command == "NOOP" {
            b"250 OK\r\n"
        } else if command == "QUIT" {
            write.write_all(b"221 Bye\r\n").await?;
            break;
        } else {
            b"502 Command not implemented\r\n"
        };

        write.write_all(reply).await?;
    }

    Ok(())
}

/// `<jane@example.com> SIZE=123` -> `jane@example.com`
fn strip_path(arg: &str) -> String {
    let arg = arg.trim();
    let arg = arg.split_whitespace().next().unwrap_or_default();
    arg.trim_start_matches('<').trim_end_matches('>').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_path_variants() {
        assert_eq!(strip_path("<jane@example.com>"), "jane@example.com");
        assert_eq!(strip_path(" <jane@example.com> SIZE=42"), "jane@example.com");
        assert_eq!(strip_path("jane@example.com"), "jane@example.com");
    }

    #[tokio::test]
    async fn accept_mail() {
        // Arrange
        let (addr, mut rx) = spawn_server(SmtpBehavior::Accept).await.unwrap();
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        // Act
        let mut replies = Vec::new();
        replies.push(lines.next_line().await.unwrap().unwrap());
        for command in [
            "EHLO client",
            "MAIL FROM:<noreply@example.com>",
            "RCPT TO:<contact@example.com>",
            "DATA",
        ] {
            write
                .write_all(format!("{command}\r\n").as_bytes())
                .await
                .unwrap();
            replies.push(lines.next_line().await.unwrap().unwrap());
        }
        write
            .write_all(b"Subject: Hello\r\n\r\n..dotted\r\n.\r\n")
            .await
            .unwrap();
        replies.push(lines.next_line().await.unwrap().unwrap());

        // Assert
        let codes = replies.iter().map(|x| &x[..3]).collect::<Vec<_>>();
        assert_eq!(codes, ["220", "250", "250", "250", "354", "250"]);

        let mail = rx.recv().await.unwrap();
        assert_eq!(
            mail,
            ReceivedMail {
                from: "noreply@example.com".into(),
                recipients: vec!["contact@example.com".into()],
                data: "Subject: Hello\n\n.dotted".into(),
            }
        );
    }
}
