use mos6502::{Address, Bus, Core, CoreError, Ram, SharedBus};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn machine(org: u16, prog: &[u8]) -> (Core, Ram) {
    init();
    let mut ram = Ram::new();
    ram.copy(org, prog);
    let mut core = Core::new();
    core.set_pc(org);
    (core, ram)
}

/* Ticks until the core sits ready at `stop`, returns the ticks spent. */
fn run_until<B: Bus>(core: &mut Core, bus: &mut B, stop: u16, max_ticks: u64) -> u64 {
    let start = core.ticks();
    while !(core.is_ready() && core.pc() == Address::new(stop)) {
        core.tick(bus).unwrap();
        assert!(core.ticks() - start <= max_ticks, "runaway at {:?}", core);
    }
    core.ticks() - start
}

#[test]
fn sum_loop() {
    let prog = [
        0xA2, 0x0A,     // LDX #10
        0xA9, 0x00,     // LDA #0
        0x18,           // CLC
        0x86, 0x10,     // loop: STX $10
        0x65, 0x10,     // ADC $10
        0xCA,           // DEX
        0xD0, 0xF9,     // BNE loop
        0x85, 0x20,     // STA $20
        0x00,           // BRK
    ];
    let (mut core, mut ram) = machine(0x0600, &prog);

    let ticks = run_until(&mut core, &mut ram, 0x060E, 1000);
    assert_eq!(ram.get(0x0020), 55);
    assert_eq!(core.x(), 0);
    assert!(core.zero());
    assert_eq!(ticks, 6 + 9 * 11 + 10 + 3);
}

#[test]
fn copy_subroutine() {
    let prog = [
        0xA9, 0x00, 0x85, 0xFB,     // src = $3000
        0xA9, 0x30, 0x85, 0xFC,
        0xA9, 0xF0, 0x85, 0xFD,     // dst = $40F0
        0xA9, 0x40, 0x85, 0xFE,
        0x20, 0x00, 0x07,           // JSR copy
        0xEA,
    ];
    let copy = [
        0xA0, 0x00,     // LDY #0
        0xB1, 0xFB,     // loop: LDA ($FB),Y
        0x91, 0xFD,     // STA ($FD),Y
        0xC8,           // INY
        0xC0, 0x20,     // CPY #$20
        0xD0, 0xF7,     // BNE loop
        0x60,           // RTS
    ];
    let (mut core, mut ram) = machine(0x0600, &prog);
    ram.copy(0x0700, &copy);
    let src: Vec<u8> = (0..0x20u8).map(|i| i.wrapping_mul(7) ^ 0x5A).collect();
    ram.copy(0x3000, &src);

    run_until(&mut core, &mut ram, 0x0613, 10_000);
    assert_eq!(&ram.as_slice()[0x40F0..0x4110], &src[..]);
    assert_eq!(core.y(), 0x20);
    assert_eq!(core.s(), 0xFD);
}

#[test]
fn brk_handler_and_rti() {
    let prog = [
        0x00, 0xEA,     // BRK
        0x00, 0xEA,     // BRK
        0xA5, 0x30,     // LDA $30
        0xEA,
    ];
    let (mut core, mut ram) = machine(0x0600, &prog);
    ram.copy(0x0800, &[0xE6, 0x30, 0x40]);  // INC $30, RTI
    ram.set_u16(0xFFFE, 0x0800);

    let ticks = run_until(&mut core, &mut ram, 0x0606, 1000);
    assert_eq!(core.a(), 2);
    assert_eq!(core.s(), 0xFD);
    assert!(core.interrupt());
    assert!(!core.brk_flag());
    assert_eq!(ticks, 2 * (7 + 5 + 6) + 3);
}

#[test]
fn unknown_opcode_stops_at_boundary() {
    let (mut core, mut ram) = machine(0x0600, &[0xA9, 0x01, 0xE8, 0x02, 0xEA]);

    let err = loop {
        if let Err(e) = core.tick(&mut ram) {
            break e;
        }
    };
    assert_eq!(err, CoreError::UnknownOpcode { opcode: 0x02, pc: Some(Address::new(0x0603)) });
    assert_eq!(err.to_string(), "unknown opcode 0x02 at 0603");
    assert_eq!(core.pc(), Address::new(0x0603));
    assert_eq!(core.ticks(), 4);
    assert!(core.is_ready());

    /* still stuck on retry */
    assert!(core.tick(&mut ram).is_err());
    assert_eq!(core.ticks(), 4);
}

#[test]
fn shared_bus_inspection() {
    init();
    let mut ram = Ram::new();
    ram.copy(0x0200, &[0xE6, 0x40, 0x4C, 0x00, 0x02]);   // INC $40, JMP $0200
    let mut bus = SharedBus::new(ram);
    let monitor = bus.clone();
    let mut core = Core::new();
    core.set_pc(0x0200u16);

    let mut last = 0;
    for _ in 0..8 {
        for _ in 0..8 {
            core.tick(&mut bus).unwrap();
        }
        let count = monitor.peek(Address::new(0x0040));
        assert_eq!(count, last + 1);
        last = count;
    }

    monitor.poke(Address::new(0x0040), 0xFF);
    run_until(&mut core, &mut bus, 0x0202, 16);
    assert_eq!(monitor.with(|ram| ram.get(0x0040)), 0x00);
    assert!(core.zero());
}
