//! Runners backed by the shared MAME binary.

use crate::descriptor::RunnerDescriptor;
use crate::mame::{self, Compatibility, MameDriver};

pub fn runners() -> Vec<RunnerDescriptor> {
    vec![
        mame::descriptor(
            "mame_nes",
            &["nes"],
            &["nes", "unf"],
            MameDriver::new("nes", "cart"),
        ),
        mame::descriptor(
            "mame_apple2e",
            &["apple2"],
            &["dsk", "do", "po", "woz", "nib"],
            MameDriver::new("apple2e", "flop1")
                .slot_option("gameio", "joy")
                .configurable_slot(
                    "sl6",
                    &["diskiing", "diskii", "d2fdc"],
                    "diskiing",
                    "Disk controller card in slot 6",
                ),
        ),
        mame::descriptor(
            "mame_c64_tape",
            &["c64"],
            &["tap"],
            MameDriver::new("c64", "cass")
                .autoboot("c64_cass")
                .compatibility(Compatibility::Imperfect),
        ),
        mame::descriptor(
            "mame_vsmile",
            &["vsmile"],
            &["bin", "u1"],
            MameDriver::new("vsmile", "cart").compatibility(Compatibility::Preliminary),
        ),
        mame::descriptor("mame_arcade", &["arcade"], &["zip", "7z"], MameDriver::fixed()),
    ]
}
