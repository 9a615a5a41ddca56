//! Turning envelopes into terminal lines.

use parley_server::domain::Envelope;

/// How an envelope should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Print and keep going
    Line(String),
    /// Print, then end the session with a failure
    Fatal(String),
}

impl Rendered {
    pub fn text(&self) -> &str {
        match self {
            Self::Line(text) | Self::Fatal(text) => text,
        }
    }
}

pub fn render(envelope: &Envelope) -> Rendered {
    match envelope {
        Envelope::Server { message, .. } => Rendered::Line(message.clone()),
        Envelope::Error { message, .. } => Rendered::Fatal(message.clone()),
        Envelope::Text {
            time,
            address,
            name,
            message,
        } => Rendered::Line(format!(
            "{} {}:{}/~{}: {}",
            time,
            address.ip(),
            address.port(),
            name,
            message
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        // テスト項目: text エンベロープは "時刻 IP:ポート/~名前: 本文" で表示される
        // given (前提条件):
        let envelope = Envelope::Text {
            time: "14:05 03/02/2024".to_string(),
            address: "10.0.0.7:51234".parse().unwrap(),
            name: "alice".to_string(),
            message: "hello there".to_string(),
        };

        // when (操作):
        let rendered = render(&envelope);

        // then (期待する結果):
        assert_eq!(
            rendered,
            Rendered::Line("14:05 03/02/2024 10.0.0.7:51234/~alice: hello there".to_string())
        );
    }

    #[test]
    fn test_render_server_message_is_plain() {
        // テスト項目: server エンベロープは本文だけが表示される
        let rendered = render(&Envelope::server("Connected peers: alice, bob"));
        assert_eq!(rendered, Rendered::Line("Connected peers: alice, bob".to_string()));
    }

    #[test]
    fn test_render_error_is_fatal() {
        // テスト項目: error エンベロープはセッション終了として扱われる
        let rendered = render(&Envelope::error("Name already in use, choose another one."));
        assert_eq!(
            rendered,
            Rendered::Fatal("Name already in use, choose another one.".to_string())
        );
        assert_eq!(rendered.text(), "Name already in use, choose another one.");
    }
}
