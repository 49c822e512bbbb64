use owo_colors::OwoColorize;

/// Consistent, colored user-facing console lines. Colors are enabled only
/// when the stream is a TTY, so piped output stays clean.
#[derive(Clone, Copy)]
enum Kind {
    Info,
    Warn,
    Error,
    Success,
}

fn emit(kind: Kind, msg: &str) {
    match kind {
        Kind::Info => {
            if atty::is(atty::Stream::Stdout) {
                println!("{} {}", "info:".cyan().bold(), msg);
            } else {
                println!("info: {}", msg);
            }
        }
        Kind::Warn => {
            if atty::is(atty::Stream::Stderr) {
                eprintln!("{} {}", "warn:".yellow().bold(), msg);
            } else {
                eprintln!("warn: {}", msg);
            }
        }
        Kind::Error => {
            if atty::is(atty::Stream::Stderr) {
                eprintln!("{} {}", "error:".red().bold(), msg);
            } else {
                eprintln!("error: {}", msg);
            }
        }
        Kind::Success => {
            if atty::is(atty::Stream::Stdout) {
                println!("{} {}", "ok:".green().bold(), msg);
            } else {
                println!("ok: {}", msg);
            }
        }
    }
}

pub fn print_info(msg: &str) {
    emit(Kind::Info, msg);
}

pub fn print_warn(msg: &str) {
    emit(Kind::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Kind::Error, msg);
}

pub fn print_success(msg: &str) {
    emit(Kind::Success, msg);
}

/// Plain line with no prefix. Used for primary outputs such as the final
/// "Processed 120 of 120 files" summary, which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}
