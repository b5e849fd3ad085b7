fn main() -> std::process::ExitCode {
    unit_calc_lib::run()
}
