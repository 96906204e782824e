//! Human-readable rendering of messages.
//!
//! Log tooling scrapes this output, so field order, alignment and
//! punctuation are fixed. Each block lists fields in encode order, one per
//! line, as `    .<name padded to 13>= <value>`.

use core::fmt::{self, Write as _};

use crate::message::{Crud, Event, Message, Nvp, Req};
use crate::WrpError;

const NULL: &str = "(null)";

/// Renders `message` as its multi-line block form.
pub fn to_display_string(message: &Message) -> Result<String, WrpError> {
    let mut out = String::new();
    write_block(&mut out, message).map_err(|_| WrpError::OtherError)?;
    Ok(out)
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, self)
    }
}

fn write_block<W: fmt::Write>(out: &mut W, message: &Message) -> fmt::Result {
    let name = message.msg_type().block_name();
    match message {
        Message::SvcAlive => return writeln!(out, "{name} {{}}"),
        _ => writeln!(out, "{name} {{")?,
    }
    let mut block = Block { out };
    match message {
        Message::Auth(auth) => block.int("status", auth.status)?,
        Message::Req(req) => write_req(&mut block, req)?,
        Message::Event(event) => write_event(&mut block, event)?,
        Message::Create(crud)
        | Message::Retrieve(crud)
        | Message::Update(crud)
        | Message::Delete(crud) => write_crud(&mut block, crud)?,
        Message::SvcReg(reg) => {
            block.str("service_name", &reg.service_name)?;
            block.str("url", &reg.url)?;
        }
        Message::SvcAlive => {}
    }
    writeln!(block.out, "}}")
}

fn write_req<W: fmt::Write>(block: &mut Block<'_, W>, req: &Req) -> fmt::Result {
    block.str("dest", &req.dest)?;
    block.str("source", &req.source)?;
    block.bin("payload", &req.payload)?;
    block.str("trans_id", &req.trans_id)?;
    block.opt_str("accept", req.accept.as_deref())?;
    block.opt_str("content_type", req.content_type.as_deref())?;
    block.list("headers", &req.headers)?;
    block.nvps("metadata", &req.metadata)?;
    block.opt_str("msg_id", req.msg_id.as_deref())?;
    block.list("partner_ids", &req.partner_ids)?;
    block.opt_int("rdr", req.rdr)?;
    block.opt_str("session_id", req.session_id.as_deref())?;
    block.opt_int("status", req.status)
}

fn write_event<W: fmt::Write>(block: &mut Block<'_, W>, event: &Event) -> fmt::Result {
    block.str("dest", &event.dest)?;
    block.str("source", &event.source)?;
    block.opt_str("content_type", event.content_type.as_deref())?;
    block.list("headers", &event.headers)?;
    block.nvps("metadata", &event.metadata)?;
    block.opt_str("msg_id", event.msg_id.as_deref())?;
    block.list("partner_ids", &event.partner_ids)?;
    block.opt_bin("payload", event.payload.as_deref())?;
    block.opt_int("rdr", event.rdr)?;
    block.opt_str("session_id", event.session_id.as_deref())?;
    block.opt_str("trans_id", event.trans_id.as_deref())
}

fn write_crud<W: fmt::Write>(block: &mut Block<'_, W>, crud: &Crud) -> fmt::Result {
    block.str("dest", &crud.dest)?;
    block.str("source", &crud.source)?;
    block.str("trans_id", &crud.trans_id)?;
    block.opt_str("accept", crud.accept.as_deref())?;
    block.opt_str("content_type", crud.content_type.as_deref())?;
    block.list("headers", &crud.headers)?;
    block.nvps("metadata", &crud.metadata)?;
    block.opt_str("msg_id", crud.msg_id.as_deref())?;
    block.list("partner_ids", &crud.partner_ids)?;
    block.opt_str("path", crud.path.as_deref())?;
    block.opt_bin("payload", crud.payload.as_deref())?;
    block.opt_int("rdr", crud.rdr)?;
    block.opt_str("session_id", crud.session_id.as_deref())?;
    block.opt_int("status", crud.status)
}

struct Block<'o, W: fmt::Write> {
    out: &'o mut W,
}

impl<W: fmt::Write> Block<'_, W> {
    fn line(&mut self, name: &str, value: fmt::Arguments<'_>) -> fmt::Result {
        writeln!(self.out, "    .{name:<13}= {value}")
    }

    fn str(&mut self, name: &str, value: &str) -> fmt::Result {
        self.line(name, format_args!("'{value}'"))
    }

    fn opt_str(&mut self, name: &str, value: Option<&str>) -> fmt::Result {
        match value {
            Some(value) => self.str(name, value),
            None => self.line(name, format_args!("{NULL}")),
        }
    }

    fn int(&mut self, name: &str, value: i32) -> fmt::Result {
        self.line(name, format_args!("{value}"))
    }

    fn opt_int(&mut self, name: &str, value: Option<i32>) -> fmt::Result {
        match value {
            Some(value) => self.int(name, value),
            None => self.line(name, format_args!("{NULL}")),
        }
    }

    fn bin(&mut self, name: &str, value: &[u8]) -> fmt::Result {
        self.line(name, format_args!("<{} bytes>", value.len()))
    }

    fn opt_bin(&mut self, name: &str, value: Option<&[u8]>) -> fmt::Result {
        match value {
            Some(value) => self.bin(name, value),
            None => self.line(name, format_args!("{NULL}")),
        }
    }

    fn list(&mut self, name: &str, values: &[String]) -> fmt::Result {
        self.line(name, format_args!("[{}]", values.join(", ")))
    }

    fn nvps(&mut self, name: &str, values: &[Nvp]) -> fmt::Result {
        let mut rendered = String::new();
        for (idx, nvp) in values.iter().enumerate() {
            if idx > 0 {
                rendered.push_str(", ");
            }
            match &nvp.value {
                Some(value) => write!(rendered, ".{}: '{}'", nvp.name, value)?,
                None => write!(rendered, ".{}: {NULL}", nvp.name)?,
            }
        }
        self.line(name, format_args!("{{{rendered}}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Auth, SvcReg};

    #[test]
    fn auth_block() {
        let text = to_display_string(&Message::Auth(Auth { status: 200 })).expect("display");
        assert_eq!(text, "wrp_auth {\n    .status       = 200\n}\n");
    }

    #[test]
    fn svc_alive_block() {
        assert_eq!(Message::SvcAlive.to_string(), "wrp_svc_alive {}\n");
    }

    #[test]
    fn svc_reg_block() {
        let message = Message::SvcReg(SvcReg {
            service_name: "iot".into(),
            url: "tcp://127.0.0.1:4801".into(),
        });
        assert_eq!(
            message.to_string(),
            "wrp_svc_reg {\n    .service_name = 'iot'\n    .url          = 'tcp://127.0.0.1:4801'\n}\n"
        );
    }

    #[test]
    fn lists_and_metadata() {
        let message = Message::Req(Req {
            dest: "mac:112233445566".into(),
            source: "dns:example.com".into(),
            payload: vec![0; 4],
            trans_id: "t".into(),
            headers: vec!["a".into(), "b".into()],
            metadata: vec![Nvp::new("k", "v"), Nvp::absent("gone")],
            ..Default::default()
        });
        let text = message.to_string();
        assert!(text.starts_with("wrp_req {\n    .dest         = 'mac:112233445566'\n"));
        assert!(text.contains("    .payload      = <4 bytes>\n"));
        assert!(text.contains("    .headers      = [a, b]\n"));
        assert!(text.contains("    .metadata     = {.k: 'v', .gone: (null)}\n"));
        assert!(text.contains("    .partner_ids  = []\n"));
        assert!(text.contains("    .rdr          = (null)\n"));
        assert!(text.ends_with("    .status       = (null)\n}\n"));
    }
}
