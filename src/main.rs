use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fixmath::{functions, Big, DigitsAfterPoint, FormatOpts, MathError, UInt};

/// Calculator precision: 128-bit exponent, 256-bit mantissa.
type Calc = Big<2, 4>;

#[derive(Parser)]
#[command(name = "fixmath", about = "Fixed-capacity big-number calculator and test runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an infix expression, e.g. "sin(pi/6) + 2^100"
    Eval {
        expr: String,
        /// Base for numbers in the expression and for the result (2..=16)
        #[arg(long, default_value_t = 10)]
        base: u32,
        /// Print at most this many digits after the point
        #[arg(long)]
        digits: Option<usize>,
    },
    /// Run regression files against the integer kernel at several widths
    Check {
        files: Vec<PathBuf>,
        /// Worker threads for processing the files
        #[arg(long, default_value_t = 1)]
        threads: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Eval { expr, base, digits } => run_eval(&expr, base, digits),
        Command::Check { files, threads } => run_check(&files, threads),
    }
}

fn run_eval(expr: &str, base: u32, digits: Option<usize>) -> ExitCode {
    if !(2..=16).contains(&base) {
        eprintln!("base must be between 2 and 16");
        return ExitCode::FAILURE;
    }

    match eval(expr, base) {
        Ok(value) => {
            let opts = FormatOpts::new().base(base).digits_after_point(match digits {
                Some(n) => DigitsAfterPoint::Max(n),
                None => DigitsAfterPoint::TrimZeros,
            });
            match value.to_radix(&opts) {
                Ok(s) => {
                    println!("{s}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("cannot format result: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Error)]
enum EvalError {
    #[error("syntax error at position {0}")]
    Syntax(usize),
    #[error("unknown name '{0}'")]
    UnknownName(String),
    #[error("{0} takes {1} argument(s)")]
    Arity(&'static str, usize),
    #[error(transparent)]
    Math(#[from] MathError),
}

#[derive(Debug, Clone)]
enum Token {
    Num(Calc),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

fn is_digit(c: char, base: u32) -> bool {
    c.to_digit(16).map_or(false, |d| d < base)
}

fn tokenize(input: &str, base: u32) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        let pos = input.len() - rest.len();
        match c {
            ' ' | '\t' => rest = &rest[1..],
            '+' => {
                tokens.push(Token::Plus);
                rest = &rest[1..];
            }
            '-' => {
                tokens.push(Token::Minus);
                rest = &rest[1..];
            }
            '*' => {
                tokens.push(Token::Star);
                rest = &rest[1..];
            }
            '/' => {
                tokens.push(Token::Slash);
                rest = &rest[1..];
            }
            '^' => {
                tokens.push(Token::Caret);
                rest = &rest[1..];
            }
            '(' => {
                tokens.push(Token::LParen);
                rest = &rest[1..];
            }
            ')' => {
                tokens.push(Token::RParen);
                rest = &rest[1..];
            }
            ',' => {
                tokens.push(Token::Comma);
                rest = &rest[1..];
            }
            _ if is_digit(c, base) || c == '.' || c == '#' || c == '&' => {
                let (value, carry, tail) = Calc::parse_radix(rest, base);
                if carry {
                    return Err(EvalError::Math(MathError::Overflow));
                }
                if tail.len() == rest.len() {
                    return Err(EvalError::Syntax(pos));
                }
                tokens.push(Token::Num(value));
                rest = tail;
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let end = rest
                    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .unwrap_or(rest.len());
                tokens.push(Token::Ident(rest[..end].to_owned()));
                rest = &rest[end..];
            }
            _ => return Err(EvalError::Syntax(pos)),
        }
    }

    Ok(tokens)
}

struct EvalParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl EvalParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect_rparen(&mut self) -> Result<(), EvalError> {
        match self.next() {
            Some(Token::RParen) => Ok(()),
            _ => Err(EvalError::Syntax(self.pos)),
        }
    }

    fn expr(&mut self) -> Result<Calc, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    if value.add(rhs) {
                        return Err(MathError::Overflow.into());
                    }
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    if value.sub(rhs) {
                        return Err(MathError::Overflow.into());
                    }
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Calc, EvalError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if value.mul(&rhs) {
                        return Err(MathError::Overflow.into());
                    }
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs.is_zero() {
                        return Err(MathError::DivisionByZero.into());
                    }
                    if value.div(&rhs) {
                        return Err(MathError::Overflow.into());
                    }
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<Calc, EvalError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.pos += 1;
            let mut value = self.unary()?;
            value.change_sign();
            return Ok(value);
        }
        self.factor()
    }

    fn factor(&mut self) -> Result<Calc, EvalError> {
        let mut value = self.primary()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.pos += 1;
            let exponent = self.unary()?;
            value.pow(&exponent)?;
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<Calc, EvalError> {
        match self.next() {
            Some(Token::Num(v)) => Ok(v),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect_rparen()?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.pos += 1;
                    let mut args = vec![self.expr()?];
                    while matches!(self.peek(), Some(Token::Comma)) {
                        self.pos += 1;
                        args.push(self.expr()?);
                    }
                    self.expect_rparen()?;
                    apply_function(&name, &args)
                } else {
                    constant(&name)
                }
            }
            _ => Err(EvalError::Syntax(self.pos)),
        }
    }
}

fn constant(name: &str) -> Result<Calc, EvalError> {
    let mut value = Calc::zero();
    match name {
        "pi" => value.set_pi(),
        "e" => value.set_e(),
        _ => return Err(EvalError::UnknownName(name.to_owned())),
    }
    Ok(value)
}

fn apply_function(name: &str, args: &[Calc]) -> Result<Calc, EvalError> {
    let one_arg = |n: &'static str| -> Result<&Calc, EvalError> {
        match args {
            [x] => Ok(x),
            _ => Err(EvalError::Arity(n, 1)),
        }
    };

    let value = match name {
        "sin" => functions::sin(one_arg("sin")?),
        "cos" => functions::cos(one_arg("cos")?),
        "tan" => functions::tan(one_arg("tan")?)?,
        "ctan" => functions::ctan(one_arg("ctan")?)?,
        "asin" => functions::asin(one_arg("asin")?)?,
        "acos" => functions::acos(one_arg("acos")?)?,
        "atan" => functions::atan(one_arg("atan")?),
        "actan" => functions::actan(one_arg("actan")?),
        "exp" => functions::exp(one_arg("exp")?)?,
        "ln" => functions::ln(one_arg("ln")?)?,
        "log" => match args {
            [x, base] => functions::log(x, base)?,
            _ => return Err(EvalError::Arity("log", 2)),
        },
        "sqrt" => {
            let mut v = *one_arg("sqrt")?;
            let mut half = Calc::zero();
            half.set_half();
            v.pow(&half)?;
            v
        }
        "abs" => functions::abs(one_arg("abs")?),
        "round" => functions::round(one_arg("round")?)?,
        "int" => functions::skip_fraction(one_arg("int")?),
        "frac" => functions::remain_fraction(one_arg("frac")?),
        "factorial" => functions::factorial(one_arg("factorial")?)?,
        _ => return Err(EvalError::UnknownName(name.to_owned())),
    };
    Ok(value)
}

fn eval(input: &str, base: u32) -> Result<Calc, EvalError> {
    let tokens = tokenize(input, base)?;
    debug!(count = tokens.len(), "tokenized expression");

    let mut parser = EvalParser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(EvalError::Syntax(parser.pos));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// regression runner
//
// File format, one case per line, '#' starts a comment:
//
//   OP MIN_BITS MAX_BITS A B EXPECTED EXPECTED_CARRY
//
// The case runs at every supported width (64..256 bits in 64-bit steps)
// within [MIN_BITS, MAX_BITS]; 0 means unbounded. Operands that do not
// fit a width are skipped at that width.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

struct Case {
    line_no: usize,
    op: Op,
    min_bits: usize,
    max_bits: usize,
    a: String,
    b: String,
    expected: String,
    expected_carry: bool,
}

fn parse_case(line_no: usize, line: &str) -> Result<Option<Case>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [op, min_bits, max_bits, a, b, expected, carry] = fields[..] else {
        return Err(format!("line {line_no}: expected 7 fields, got {}", fields.len()));
    };

    let op = match op {
        "ADD" => Op::Add,
        "SUB" => Op::Sub,
        "MUL" => Op::Mul,
        "DIV" => Op::Div,
        "MOD" => Op::Mod,
        other => return Err(format!("line {line_no}: unknown operation {other}")),
    };

    let parse_bits = |s: &str| s.parse::<usize>().map_err(|e| format!("line {line_no}: {e}"));
    let expected_carry = match carry {
        "0" => false,
        "1" => true,
        other => return Err(format!("line {line_no}: carry must be 0 or 1, got {other}")),
    };

    Ok(Some(Case {
        line_no,
        op,
        min_bits: parse_bits(min_bits)?,
        max_bits: parse_bits(max_bits)?,
        a: a.to_owned(),
        b: b.to_owned(),
        expected: expected.to_owned(),
        expected_carry,
    }))
}

fn check_case_at<const N: usize>(case: &Case) -> Result<(), String> {
    // operands wider than this width are out of scope for it
    let (Ok(a), Ok(b), Ok(expected)) = (
        UInt::<N>::from_radix(&case.a, 10),
        UInt::<N>::from_radix(&case.b, 10),
        UInt::<N>::from_radix(&case.expected, 10),
    ) else {
        return Ok(());
    };

    let (value, carry) = match case.op {
        Op::Add => {
            let mut v = a;
            let c = v.add(&b);
            (v, c)
        }
        Op::Sub => {
            let mut v = a;
            let c = v.sub(&b);
            (v, c)
        }
        Op::Mul => {
            let mut v = a;
            let c = v.mul(&b);
            (v, c)
        }
        Op::Div => {
            let mut v = a;
            match v.div_rem(&b) {
                Some(_) => (v, false),
                None => (UInt::zero(), true),
            }
        }
        Op::Mod => match { a }.div_rem(&b) {
            Some(r) => (r, false),
            None => (UInt::zero(), true),
        },
    };

    if value != expected || carry != case.expected_carry {
        return Err(format!(
            "line {}: {:?} {} {} at {} bits: got {} carry {}, want {} carry {}",
            case.line_no,
            case.op,
            case.a,
            case.b,
            N * 64,
            value,
            carry as u8,
            case.expected,
            case.expected_carry as u8,
        ));
    }
    Ok(())
}

fn run_case(case: &Case) -> Result<(), String> {
    macro_rules! sweep {
        ($($n:literal),*) => {
            $(
                let bits = $n * 64;
                if (case.min_bits == 0 || case.min_bits <= bits)
                    && (case.max_bits == 0 || bits <= case.max_bits)
                {
                    check_case_at::<$n>(case)?;
                }
            )*
        };
    }
    sweep!(1, 2, 3, 4);
    Ok(())
}

fn run_file(path: &PathBuf) -> Vec<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return vec![format!("{}: {e}", path.display())],
    };

    let mut failures = Vec::new();
    for (i, line) in content.lines().enumerate() {
        match parse_case(i + 1, line) {
            Ok(Some(case)) => {
                if let Err(msg) = run_case(&case) {
                    failures.push(format!("{}: {msg}", path.display()));
                }
            }
            Ok(None) => {}
            Err(msg) => failures.push(format!("{}: {msg}", path.display())),
        }
    }
    failures
}

fn run_check(files: &[PathBuf], threads: usize) -> ExitCode {
    if files.is_empty() {
        eprintln!("no files given");
        return ExitCode::FAILURE;
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .use_current_thread()
        .build()
        .expect("failed to build the thread pool");

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("progress template is valid"),
    );

    let failures: Vec<String> = pool.install(|| {
        files
            .par_iter()
            .flat_map(|path| {
                let result = run_file(path);
                bar.inc(1);
                result
            })
            .collect()
    });

    bar.finish_and_clear();
    info!(files = files.len(), failures = failures.len(), "check finished");

    if failures.is_empty() {
        println!("ok: {} file(s)", files.len());
        ExitCode::SUCCESS
    } else {
        for f in &failures {
            eprintln!("FAIL {f}");
        }
        ExitCode::FAILURE
    }
}
