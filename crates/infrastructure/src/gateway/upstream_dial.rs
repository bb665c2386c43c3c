use std::io;
use std::net::SocketAddr;

use byteorder::{BigEndian, ByteOrder};
use proxyforge_domain::{Protocol, ProxyRecord};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Dials `upstream` (a pool member) and establishes a tunnel to
/// `target_host:target_port` through whatever protocol the upstream
/// speaks. Returns the connected stream ready for bidirectional relay.
///
/// Client-side counterpart of a SOCKS4/5 server handshake: issues the
/// request and parses the server's reply instead of the reverse.
pub async fn dial_tunnel(
    upstream: &ProxyRecord,
    target_host: &str,
    target_port: u16,
) -> io::Result<TcpStream> {
    let upstream_addr = SocketAddr::from((upstream.ip, upstream.port));
    let mut stream = TcpStream::connect(upstream_addr).await?;

    match upstream.protocol {
        Protocol::Http => {
            http_connect(&mut stream, target_host, target_port).await?;
        }
        Protocol::Socks4 => {
            socks4_connect(&mut stream, target_host, target_port).await?;
        }
        Protocol::Socks5 => {
            socks5_connect(&mut stream, target_host, target_port).await?;
        }
    }

    Ok(stream)
}

async fn http_connect(stream: &mut TcpStream, host: &str, port: u16) -> io::Result<()> {
    let request = format!(
        "CONNECT {host}:{port} HTTP/1.1\r\nHost: {host}:{port}\r\nProxy-Connection: Keep-Alive\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await?;

    let mut buf = Vec::with_capacity(256);
    let mut byte = [0u8; 1];
    loop {
        stream.read_exact(&mut byte).await?;
        buf.push(byte[0]);
        if buf.ends_with(b"\r\n\r\n") {
            break;
        }
        if buf.len() > 8192 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "CONNECT response too large"));
        }
    }

    let status_line = buf
        .split(|&b| b == b'\n')
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "empty CONNECT response"))?;
    let status_line = String::from_utf8_lossy(status_line);
    if !status_line.contains("200") {
        return Err(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("upstream CONNECT refused: {}", status_line.trim()),
        ));
    }
    Ok(())
}

/// SOCKS4/4a client CONNECT handshake. Uses the 4a domain-name extension
/// when `host` does not parse as an IPv4 literal.
async fn socks4_connect(stream: &mut TcpStream, host: &str, port: u16) -> io::Result<()> {
    let mut req = Vec::with_capacity(32);
    req.push(0x04); // VN
    req.push(0x01); // CD = CONNECT
    let mut port_buf = [0u8; 2];
    BigEndian::write_u16(&mut port_buf, port);
    req.extend_from_slice(&port_buf);

    match host.parse::<std::net::Ipv4Addr>() {
        Ok(ip) => {
            req.extend_from_slice(&ip.octets());
            req.push(0x00); // USERID terminator
        }
        Err(_) => {
            // SOCKS4a: dest IP 0.0.0.1, userid empty, then domain name.
            req.extend_from_slice(&[0, 0, 0, 1]);
            req.push(0x00);
            req.extend_from_slice(host.as_bytes());
            req.push(0x00);
        }
    }

    stream.write_all(&req).await?;

    let mut reply = [0u8; 8];
    stream.read_exact(&mut reply).await?;
    if reply[1] != 0x5a {
        return Err(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("SOCKS4 upstream rejected connect (code {})", reply[1]),
        ));
    }
    Ok(())
}

async fn socks5_connect(stream: &mut TcpStream, host: &str, port: u16) -> io::Result<()> {
    // Greeting: version 5, one auth method, no-auth (0x00).
    stream.write_all(&[0x05, 0x01, 0x00]).await?;
    let mut resp = [0u8; 2];
    stream.read_exact(&mut resp).await?;
    if resp[0] != 0x05 || resp[1] != 0x00 {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            "SOCKS5 upstream requires unsupported auth method",
        ));
    }

    let mut req = Vec::with_capacity(32);
    req.extend_from_slice(&[0x05, 0x01, 0x00]); // VER, CMD=CONNECT, RSV

    match host.parse::<std::net::Ipv4Addr>() {
        Ok(ip) => {
            req.push(0x01); // ATYP = IPv4
            req.extend_from_slice(&ip.octets());
        }
        Err(_) => {
            req.push(0x03); // ATYP = domain name
            req.push(host.len() as u8);
            req.extend_from_slice(host.as_bytes());
        }
    }
    let mut port_buf = [0u8; 2];
    BigEndian::write_u16(&mut port_buf, port);
    req.extend_from_slice(&port_buf);

    stream.write_all(&req).await?;

    let mut head = [0u8; 4];
    stream.read_exact(&mut head).await?;
    if head[1] != 0x00 {
        return Err(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("SOCKS5 upstream rejected connect (code {})", head[1]),
        ));
    }

    match head[3] {
        0x01 => {
            let mut addr = [0u8; 4 + 2];
            stream.read_exact(&mut addr).await?;
        }
        0x03 => {
            let mut len = [0u8; 1];
            stream.read_exact(&mut len).await?;
            let mut domain = vec![0u8; len[0] as usize + 2];
            stream.read_exact(&mut domain).await?;
        }
        0x04 => {
            let mut addr = [0u8; 16 + 2];
            stream.read_exact(&mut addr).await?;
        }
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported SOCKS5 bound address type {other}"),
            ));
        }
    }

    Ok(())
}
