/// How an operator interacts with scene state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Reads only its operands.
    Pure,
    /// Reads or writes scene state or hardware.
    Effect,
    /// Decides which operands are evaluated.
    Control,
}

/// The pattern operations shared by the working-pattern `P` family and
/// the explicit-pattern `PN` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatOp {
    Value,
    Len,
    Wrap,
    Start,
    End,
    Index,
    Here,
    Next,
    Prev,
    Step,
    Ins,
    Rm,
    Push,
    Pop,
    Min,
    Max,
    Rnd,
}

impl PatOp {
    pub const ALL: [PatOp; 17] = [
        PatOp::Value,
        PatOp::Len,
        PatOp::Wrap,
        PatOp::Start,
        PatOp::End,
        PatOp::Index,
        PatOp::Here,
        PatOp::Next,
        PatOp::Prev,
        PatOp::Step,
        PatOp::Ins,
        PatOp::Rm,
        PatOp::Push,
        PatOp::Pop,
        PatOp::Min,
        PatOp::Max,
        PatOp::Rnd,
    ];

    fn suffix(&self) -> &'static str {
        use PatOp::*;
        match self {
            Value => "",
            Len => ".L",
            Wrap => ".WRAP",
            Start => ".START",
            End => ".END",
            Index => ".I",
            Here => ".HERE",
            Next => ".NEXT",
            Prev => ".PREV",
            Step => ".STEP",
            Ins => ".INS",
            Rm => ".RM",
            Push => ".PUSH",
            Pop => ".POP",
            Min => ".MIN",
            Max => ".MAX",
            Rnd => ".RND",
        }
    }

    fn arity(&self) -> usize {
        use PatOp::*;
        match self {
            Value | Step | Rm | Push => 1,
            Ins => 2,
            _ => 0,
        }
    }

    fn settable(&self) -> bool {
        use PatOp::*;
        matches!(self, Value | Len | Wrap | Start | End | Index | Here)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Modulo,
    Min,
    Max,
    Lim,
    Wrap,
    Avg,
    Abs,
    Sgn,
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Inr,
    Outr,
    Ez,
    Nz,
    And,
    Or,
    Xor,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Lsh,
    Rsh,
    Qt,
    N,
    V,
    Vv,
    Bpm,
    Rand,
    Rrand,
    Toss,
    Seed,
    Ternary,
    Cv,
    CvSlew,
    CvOff,
    CvSet,
    Tr,
    TrPol,
    TrTime,
    TrTog,
    TrPulse,
    Metro,
    MetroAct,
    MetroReset,
    Time,
    TimeAct,
    Last,
    Scene,
    Script,
    ScriptPol,
    Mute,
    State,
    Break,
    Kill,
    InitP,
    InitPAll,
    InitData,
    DelClr,
    StackClr,
    StackAll,
    StackPop,
    StackLen,
    PatBank,
    P(PatOp),
    PN(PatOp),
    Turtle,
    TurtleX,
    TurtleY,
    TurtleDir,
    TurtleStep,
    TurtleFwd,
    TurtleBump,
    TurtleMove,
    TurtleTurn,
    TurtleQTurn,
    TurtleHome,
    GridLed,
    GridClr,
    GridKey,
    IiTx,
    IiRx,
    InCalMin,
    InCalMax,
    InCalReset,
    ParamCalMin,
    ParamCalMax,
    ParamCalReset,
    MidiBind,
    MidiLastEvent,
    MidiLastChannel,
    MidiLastNote,
    MidiLastVelocity,
    MidiLastController,
    MidiLastCc,
    MidiNoteCount,
    MidiNote,
    MidiVelocity,
    MidiNoteChannel,
    MidiOffCount,
    MidiOff,
    MidiOffChannel,
    MidiCcCount,
    MidiCcNumber,
    MidiCcValue,
    MidiCcChannel,
    MidiClockDiv,
    MidiClockReset,
    DeviceFlip,
}

const PLAIN: [Op; 94] = [
    Op::Add,
    Op::Sub,
    Op::Mul,
    Op::Div,
    Op::Modulo,
    Op::Min,
    Op::Max,
    Op::Lim,
    Op::Wrap,
    Op::Avg,
    Op::Abs,
    Op::Sgn,
    Op::Eq,
    Op::Ne,
    Op::Lt,
    Op::Gt,
    Op::Lte,
    Op::Gte,
    Op::Inr,
    Op::Outr,
    Op::Ez,
    Op::Nz,
    Op::And,
    Op::Or,
    Op::Xor,
    Op::BitAnd,
    Op::BitOr,
    Op::BitXor,
    Op::BitNot,
    Op::Lsh,
    Op::Rsh,
    Op::Qt,
    Op::N,
    Op::V,
    Op::Vv,
    Op::Bpm,
    Op::Rand,
    Op::Rrand,
    Op::Toss,
    Op::Seed,
    Op::Ternary,
    Op::Cv,
    Op::CvSlew,
    Op::CvOff,
    Op::CvSet,
    Op::Tr,
    Op::TrPol,
    Op::TrTime,
    Op::TrTog,
    Op::TrPulse,
    Op::Metro,
    Op::MetroAct,
    Op::MetroReset,
    Op::Time,
    Op::TimeAct,
    Op::Last,
    Op::Scene,
    Op::Script,
    Op::ScriptPol,
    Op::Mute,
    Op::State,
    Op::Break,
    Op::Kill,
    Op::InitP,
    Op::InitPAll,
    Op::InitData,
    Op::DelClr,
    Op::StackClr,
    Op::StackAll,
    Op::StackPop,
    Op::StackLen,
    Op::PatBank,
    Op::Turtle,
    Op::TurtleX,
    Op::TurtleY,
    Op::TurtleDir,
    Op::TurtleStep,
    Op::TurtleFwd,
    Op::TurtleBump,
    Op::TurtleMove,
    Op::TurtleTurn,
    Op::TurtleQTurn,
    Op::TurtleHome,
    Op::GridLed,
    Op::GridClr,
    Op::GridKey,
    Op::IiTx,
    Op::IiRx,
    Op::InCalMin,
    Op::InCalMax,
    Op::InCalReset,
    Op::ParamCalMin,
    Op::ParamCalMax,
    Op::ParamCalReset,
];

const MIDI: [Op; 20] = [
    Op::MidiBind,
    Op::MidiLastEvent,
    Op::MidiLastChannel,
    Op::MidiLastNote,
    Op::MidiLastVelocity,
    Op::MidiLastController,
    Op::MidiLastCc,
    Op::MidiNoteCount,
    Op::MidiNote,
    Op::MidiVelocity,
    Op::MidiNoteChannel,
    Op::MidiOffCount,
    Op::MidiOff,
    Op::MidiOffChannel,
    Op::MidiCcCount,
    Op::MidiCcNumber,
    Op::MidiCcValue,
    Op::MidiCcChannel,
    Op::MidiClockDiv,
    Op::MidiClockReset,
];

impl Op {
    /// Every operator, in table order.
    pub fn all() -> Vec<Op> {
        PLAIN
            .iter()
            .copied()
            .chain(MIDI.iter().copied())
            .chain(std::iter::once(Op::DeviceFlip))
            .chain(PatOp::ALL.iter().map(|p| Op::P(*p)))
            .chain(PatOp::ALL.iter().map(|p| Op::PN(*p)))
            .collect()
    }

    /// Canonical name first, then aliases.
    pub fn names(&self) -> Vec<String> {
        let fixed: &[&str] = match self {
            Op::P(p) => return vec![format!("P{}", p.suffix())],
            Op::PN(p) => return vec![format!("PN{}", p.suffix())],
            Op::Add => &["ADD", "+"],
            Op::Sub => &["SUB", "-"],
            Op::Mul => &["MUL", "*"],
            Op::Div => &["DIV", "/"],
            Op::Modulo => &["MOD", "%"],
            Op::Min => &["MIN"],
            Op::Max => &["MAX"],
            Op::Lim => &["LIM"],
            Op::Wrap => &["WRAP"],
            Op::Avg => &["AVG"],
            Op::Abs => &["ABS"],
            Op::Sgn => &["SGN"],
            Op::Eq => &["EQ", "=="],
            Op::Ne => &["NE", "!="],
            Op::Lt => &["LT", "<"],
            Op::Gt => &["GT", ">"],
            Op::Lte => &["LTE", "<="],
            Op::Gte => &["GTE", ">="],
            Op::Inr => &["INR"],
            Op::Outr => &["OUTR"],
            Op::Ez => &["EZ", "!"],
            Op::Nz => &["NZ"],
            Op::And => &["AND", "&&"],
            Op::Or => &["OR", "||"],
            Op::Xor => &["XOR"],
            Op::BitAnd => &["BAND", "&"],
            Op::BitOr => &["BOR", "|"],
            Op::BitXor => &["BXOR", "^"],
            Op::BitNot => &["BNOT", "~"],
            Op::Lsh => &["LSH", "<<"],
            Op::Rsh => &["RSH", ">>"],
            Op::Qt => &["QT"],
            Op::N => &["N"],
            Op::V => &["V"],
            Op::Vv => &["VV"],
            Op::Bpm => &["BPM"],
            Op::Rand => &["RAND"],
            Op::Rrand => &["RRAND", "RRND"],
            Op::Toss => &["TOSS"],
            Op::Seed => &["SEED"],
            Op::Ternary => &["?"],
            Op::Cv => &["CV"],
            Op::CvSlew => &["CV.SLEW"],
            Op::CvOff => &["CV.OFF"],
            Op::CvSet => &["CV.SET"],
            Op::Tr => &["TR"],
            Op::TrPol => &["TR.POL"],
            Op::TrTime => &["TR.TIME"],
            Op::TrTog => &["TR.TOG"],
            Op::TrPulse => &["TR.PULSE", "TR.P"],
            Op::Metro => &["M"],
            Op::MetroAct => &["M.ACT"],
            Op::MetroReset => &["M.RESET"],
            Op::Time => &["TIME"],
            Op::TimeAct => &["TIME.ACT"],
            Op::Last => &["LAST"],
            Op::Scene => &["SCENE"],
            Op::Script => &["SCRIPT"],
            Op::ScriptPol => &["SCRIPT.POL"],
            Op::Mute => &["MUTE"],
            Op::State => &["STATE"],
            Op::Break => &["BREAK"],
            Op::Kill => &["KILL"],
            Op::InitP => &["INIT.P"],
            Op::InitPAll => &["INIT.P.ALL"],
            Op::InitData => &["INIT.DATA"],
            Op::DelClr => &["DEL.CLR"],
            Op::StackClr => &["S.CLR"],
            Op::StackAll => &["S.ALL"],
            Op::StackPop => &["S.POP"],
            Op::StackLen => &["S.L"],
            Op::PatBank => &["P.N"],
            Op::Turtle => &["@"],
            Op::TurtleX => &["@X"],
            Op::TurtleY => &["@Y"],
            Op::TurtleDir => &["@DIR"],
            Op::TurtleStep => &["@STEP"],
            Op::TurtleFwd => &["@FWD"],
            Op::TurtleBump => &["@BUMP"],
            Op::TurtleMove => &["@MOVE"],
            Op::TurtleTurn => &["@TURN"],
            Op::TurtleQTurn => &["@QTURN"],
            Op::TurtleHome => &["@HOME"],
            Op::GridLed => &["G.LED"],
            Op::GridClr => &["G.CLR"],
            Op::GridKey => &["G.KEY"],
            Op::IiTx => &["II.TX"],
            Op::IiRx => &["II.RX"],
            Op::InCalMin => &["IN.CAL.MIN"],
            Op::InCalMax => &["IN.CAL.MAX"],
            Op::InCalReset => &["IN.CAL.RESET"],
            Op::ParamCalMin => &["PARAM.CAL.MIN"],
            Op::ParamCalMax => &["PARAM.CAL.MAX"],
            Op::ParamCalReset => &["PARAM.CAL.RESET"],
            Op::MidiBind => &["MI.$"],
            Op::MidiLastEvent => &["MI.LE"],
            Op::MidiLastChannel => &["MI.LCH"],
            Op::MidiLastNote => &["MI.LN"],
            Op::MidiLastVelocity => &["MI.LV"],
            Op::MidiLastController => &["MI.LC"],
            Op::MidiLastCc => &["MI.LCC"],
            Op::MidiNoteCount => &["MI.NL"],
            Op::MidiNote => &["MI.N"],
            Op::MidiVelocity => &["MI.V"],
            Op::MidiNoteChannel => &["MI.NCH"],
            Op::MidiOffCount => &["MI.OL"],
            Op::MidiOff => &["MI.OFF"],
            Op::MidiOffChannel => &["MI.OCH"],
            Op::MidiCcCount => &["MI.CCL"],
            Op::MidiCcNumber => &["MI.CN"],
            Op::MidiCcValue => &["MI.CC"],
            Op::MidiCcChannel => &["MI.CCH"],
            Op::MidiClockDiv => &["MI.CLKD"],
            Op::MidiClockReset => &["MI.CLKR"],
            Op::DeviceFlip => &["DEVICE.FLIP"],
        };
        fixed.iter().map(|s| s.to_string()).collect()
    }

    /// Number of operands in the getter form.
    pub fn arity(&self) -> usize {
        use Op::*;
        match self {
            P(p) => p.arity(),
            PN(p) => p.arity() + 1,
            Lim | Wrap | Inr | Outr | Ternary | IiTx => 3,
            Add | Sub | Mul | Div | Modulo | Min | Max | Avg | Eq | Ne | Lt | Gt | Lte | Gte
            | And | Or | Xor | BitAnd | BitOr | BitXor | Lsh | Rsh | Qt | Rrand | CvSet
            | TurtleMove | GridLed | GridKey | IiRx => 2,
            Abs | Sgn | Ez | Nz | BitNot | N | V | Vv | Bpm | Rand | Cv | CvSlew | CvOff | Tr
            | TrPol | TrTime | TrTog | TrPulse | Last | ScriptPol | Mute | State | InitP
            | TurtleFwd | TurtleBump | TurtleTurn | TurtleQTurn | MidiBind | MidiNote
            | MidiVelocity | MidiNoteChannel | MidiOff | MidiOffChannel | MidiCcNumber
            | MidiCcValue | MidiCcChannel => 1,
            Toss | Seed | Metro | MetroAct | MetroReset | Time | TimeAct | Scene | Script
            | Break | Kill | InitPAll | InitData | DelClr | StackClr | StackAll | StackPop
            | StackLen | PatBank | Turtle | TurtleX | TurtleY | TurtleDir | TurtleStep
            | TurtleHome | GridClr | InCalMin | InCalMax | InCalReset | ParamCalMin
            | ParamCalMax | ParamCalReset | MidiLastEvent | MidiLastChannel | MidiLastNote
            | MidiLastVelocity | MidiLastController | MidiLastCc | MidiNoteCount
            | MidiOffCount | MidiCcCount | MidiClockDiv | MidiClockReset | DeviceFlip => 0,
        }
    }

    /// True when the operator also has a setter form taking one more
    /// value after its getter operands.
    pub fn settable(&self) -> bool {
        use Op::*;
        match self {
            P(p) | PN(p) => p.settable(),
            Seed | Cv | CvSlew | CvOff | Tr | TrPol | TrTime | Metro | MetroAct | Time
            | TimeAct | Scene | Script | ScriptPol | Mute | PatBank | Turtle | TurtleX
            | TurtleY | TurtleDir | GridLed | MidiBind | MidiClockDiv => true,
            _ => false,
        }
    }

    pub fn kind(&self) -> Kind {
        use Op::*;
        match self {
            Ternary => Kind::Control,
            Add | Sub | Mul | Div | Modulo | Min | Max | Lim | Wrap | Avg | Abs | Sgn | Eq
            | Ne | Lt | Gt | Lte | Gte | Inr | Outr | Ez | Nz | And | Or | Xor | BitAnd
            | BitOr | BitXor | BitNot | Lsh | Rsh | Qt | N | V | Vv | Bpm => Kind::Pure,
            _ => Kind::Effect,
        }
    }

    /// False for operators that only make sense while their script is
    /// running, which rules them out under a deferring modifier.
    pub fn deferrable(&self) -> bool {
        !matches!(self, Op::Break)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.names().first() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "?"),
        }
    }
}
