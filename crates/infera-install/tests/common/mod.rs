//! Fixture helpers: programmatic tar.xz archives and a one-shot HTTP server.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;

use tar::{Builder, EntryType, Header};
use xz2::write::XzEncoder;

type ArchiveBuilder = Builder<XzEncoder<Vec<u8>>>;

pub fn archive(build: impl FnOnce(&mut ArchiveBuilder)) -> Vec<u8> {
    let encoder = XzEncoder::new(Vec::new(), 6);
    let mut builder = Builder::new(encoder);
    build(&mut builder);
    builder
        .into_inner()
        .expect("finish tar stream")
        .finish()
        .expect("finish xz stream")
}

pub fn add_dir(builder: &mut ArchiveBuilder, path: &str) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Directory);
    header.set_mode(0o755);
    header.set_size(0);
    builder
        .append_data(&mut header, path, std::io::empty())
        .expect("append directory entry");
}

pub fn add_file(builder: &mut ArchiveBuilder, path: &str, mode: u32, contents: &[u8]) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_mode(mode);
    header.set_size(contents.len() as u64);
    builder
        .append_data(&mut header, path, contents)
        .expect("append file entry");
}

/// Append a file entry with the raw header name written directly, bypassing
/// the `tar` crate's own `..` rejection so traversal handling can be tested.
pub fn add_raw_file(builder: &mut ArchiveBuilder, path: &str, mode: u32, contents: &[u8]) {
    let mut header = Header::new_gnu();
    {
        let gnu = header.as_gnu_mut().expect("gnu header");
        gnu.name[..path.len()].copy_from_slice(path.as_bytes());
    }
    header.set_entry_type(EntryType::Regular);
    header.set_mode(mode);
    header.set_size(contents.len() as u64);
    header.set_cksum();
    builder.append(&header, contents).expect("append raw entry");
}

pub fn add_symlink(builder: &mut ArchiveBuilder, path: &str, target: &str) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Symlink);
    header.set_mode(0o777);
    header.set_size(0);
    builder
        .append_link(&mut header, path, target)
        .expect("append symlink entry");
}

pub fn add_hard_link(builder: &mut ArchiveBuilder, path: &str, target: &str) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Link);
    header.set_mode(0o644);
    header.set_size(0);
    builder
        .append_link(&mut header, path, target)
        .expect("append hard link entry");
}

/// Archive holding a plausible analyzer layout with the executable at
/// `<root>/bin/infer`.
pub fn analyzer_archive(root: &str, exe_mode: u32) -> Vec<u8> {
    let root_bin = format!("{root}/bin/");
    let exe = format!("{root}/bin/infer");
    archive(|builder| {
        add_dir(builder, &root_bin);
        add_file(builder, &exe, exe_mode, b"#!/bin/sh\nexit 0\n");
    })
}

/// Serve exactly one HTTP response on an ephemeral local port, then shut
/// down. Returns the URL the response is served under.
pub fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture server");
    let addr = listener.local_addr().expect("fixture server addr");

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while let Ok(n) = stream.read(&mut buf) {
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let header = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        }
    });

    format!("http://{addr}/infer-linux-x86_64-v1.2.0.tar.xz")
}

#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .expect("stat extracted file")
        .permissions()
        .mode()
}

#[cfg(not(unix))]
pub fn mode_of(_path: &Path) -> u32 {
    0
}
