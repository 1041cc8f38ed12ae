/// Modifiers prefix a line and control how its body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mod {
    If,
    Elif,
    Else,
    L,
    W,
    Every,
    Skip,
    Other,
    Prob,
    Del,
    DelX,
    DelR,
    S,
}

impl Mod {
    pub const ALL: [Mod; 13] = [
        Mod::If,
        Mod::Elif,
        Mod::Else,
        Mod::L,
        Mod::W,
        Mod::Every,
        Mod::Skip,
        Mod::Other,
        Mod::Prob,
        Mod::Del,
        Mod::DelX,
        Mod::DelR,
        Mod::S,
    ];

    pub fn names(&self) -> &'static [&'static str] {
        use Mod::*;
        match self {
            If => &["IF"],
            Elif => &["ELIF"],
            Else => &["ELSE"],
            L => &["L"],
            W => &["W"],
            Every => &["EVERY", "EV"],
            Skip => &["SKIP"],
            Other => &["OTHER"],
            Prob => &["PROB"],
            Del => &["DEL"],
            DelX => &["DEL.X"],
            DelR => &["DEL.R"],
            S => &["S"],
        }
    }

    pub fn arity(&self) -> usize {
        use Mod::*;
        match self {
            Else | Other | S => 0,
            If | Elif | W | Every | Skip | Prob | Del => 1,
            L | DelX | DelR => 2,
        }
    }

    /// Deferring modifiers hand their body to the delay queue or the
    /// command stack instead of running it in place.
    pub fn defers(&self) -> bool {
        matches!(self, Mod::Del | Mod::DelX | Mod::DelR | Mod::S)
    }
}

impl std::fmt::Display for Mod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.names()[0])
    }
}
