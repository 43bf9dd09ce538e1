//! Text commands accepted by the [`crate::Session`], one per line.

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// `position startpos [moves ...]` or `position fen <FEN> [moves ...]`.
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// `move e2e4`
    Move(String),
    Undo,
    Moves,
    /// `d`
    Display,
    History,
    Perft {
        depth: u8,
    },
    Debug {
        on: bool,
    },
    IsReady,
    Id,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        let parts = input.split_ascii_whitespace().collect::<Vec<_>>();
        match parts.as_slice() {
            [] => Self::Empty,
            ["position", rest @ ..] => parse_setposition(rest).unwrap_or_else(|| unknown(input)),
            ["move", notation] => Self::Move((*notation).to_string()),
            ["undo"] => Self::Undo,
            ["moves"] => Self::Moves,
            ["d"] => Self::Display,
            ["history"] => Self::History,
            ["perft", depth] => match depth.parse() {
                Ok(depth) => Self::Perft { depth },
                Err(_) => unknown(input),
            },
            ["debug", "on"] => Self::Debug { on: true },
            ["debug", "off"] => Self::Debug { on: false },
            ["isready"] => Self::IsReady,
            ["id"] => Self::Id,
            ["quit"] => Self::Quit,
            _ => unknown(input),
        }
    }
}

fn unknown(input: &str) -> Command {
    Command::Unknown(input.to_string())
}

fn parse_setposition(parts: &[&str]) -> Option<Command> {
    let (fen, rest) = match parts {
        ["startpos", rest @ ..] => (None, rest),
        ["fen", rest @ ..] => {
            let fen_end = rest
                .iter()
                .position(|&part| part == "moves")
                .unwrap_or(rest.len());
            if fen_end == 0 {
                return None;
            }
            let (fen, rest) = rest.split_at(fen_end);
            (Some(fen.join(" ")), rest)
        },
        _ => return None,
    };
    let moves = match rest {
        [] => vec![],
        ["moves", moves @ ..] => moves.iter().map(|&m| m.to_string()).collect(),
        _ => return None,
    };
    Some(Command::SetPosition { fen, moves })
}
