fn main() {
    // Device builds need the ESP-IDF environment exported to the linker.
    // Host builds (simulator, tests) have nothing to generate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
