pub struct Logger;

fn format_record(record: &log::Record) -> String {
    format!(
        "{level:<5} {file}:{line} > {text}",
        level = record.level(),
        file = record.file().unwrap_or_else(|| record.target()),
        line = record
            .line()
            .map_or_else(|| "??".to_string(), |line| line.to_string()),
        text = record.args(),
    )
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!("{}", format_record(record));
        }
    }

    fn flush(&self) {}
}

impl Logger {
    pub fn init(max_level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_logger(&Logger)?;
        log::set_max_level(max_level);
        Ok(())
    }
}

#[test]
fn test_format_record() {
    let text = format_record(
        &log::Record::builder()
            .args(format_args!("initialized egl version 1.5"))
            .level(log::Level::Info)
            .target("gl::context_egl")
            .file(Some("gl/src/context_egl.rs"))
            .line(Some(42))
            .build(),
    );
    assert_eq!(text, "INFO  gl/src/context_egl.rs:42 > initialized egl version 1.5");

    let text = format_record(
        &log::Record::builder()
            .args(format_args!("unused window event"))
            .level(log::Level::Trace)
            .target("window::backend_winit")
            .build(),
    );
    assert_eq!(text, "TRACE window::backend_winit:?? > unused window event");
}
