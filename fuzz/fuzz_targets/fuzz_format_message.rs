#![no_main]

use arbitrary::Arbitrary;
use fieldcheck::message::format_message;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    template: String,
    label: Option<String>,
    args: Vec<String>,
}

fuzz_target!(|input: Input| {
    let _ = format_message(&input.template, input.label.as_deref(), &input.args);
});
