#![no_main]
use libfuzzer_sys::fuzz_target;
use sprig::lang::Pipeline;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(pipeline) = Pipeline::new() else {
        return;
    };

    // Whatever compiles must print back to an equal program.
    if let Ok(program) = pipeline.compile(source) {
        let printed = program.to_string();
        assert_eq!(pipeline.compile(&printed).ok(), Some(program));
    }
});
