//! Desktop bench for the triac-dimmer-core control loop.
//!
//! Runs the real core against a simulated mains half-cycle. The sliders
//! send real command frames through the receive path; the painted bars
//! show each channel's firing delay and conduction window.

use std::time::Instant as StdInstant;

use eframe::egui::{self};
use triac_dimmer_core::{
    Boundary, CHANNEL_COUNT, Calibration, Command, CommandDecoder, CommandMailbox, CycleSensor,
    Dimmer, FaultLatch, MAGNITUDE_MAX, OutputDriver, ReceiverDriver, RxFault,
};

/// Ticks of the simulated cycle counter per second (1 tick = 1 µs)
const TICKS_PER_SECOND: f64 = 1_000_000.0;

/// Half-cycle length of 50 Hz mains in ticks
const HALF_CYCLE_50HZ: u16 = 10_000;

/// Half-cycle length of 60 Hz mains in ticks
const HALF_CYCLE_60HZ: u16 = 8_333;

/// Sub-step length of the simulated control loop
const STEP_TICKS: u16 = 50;

/// Upper bound on simulated ticks per UI frame
const MAX_FRAME_TICKS: u64 = 100_000;

/// Height of a channel conduction bar in pixels
const BAR_HEIGHT: f32 = 16.0;

/// Command mailbox size
const COMMAND_MAILBOX_SIZE: usize = 16;

/// Static command mailbox between the receive path and the core
static COMMANDS: CommandMailbox<COMMAND_MAILBOX_SIZE> =
    CommandMailbox::<COMMAND_MAILBOX_SIZE>::new();

/// Static fault latch shared by the receive path and the core
static FAULT: FaultLatch = FaultLatch::new();

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 480.0])
            .with_title("Triac Dimmer Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "triac-dimmer-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

/// Simulated zero-crossing sense and cycle counter.
struct BenchSensor {
    /// Position inside the simulated half-cycle, in ticks
    mains_ticks: u16,
    /// Ticks since the core last restarted the cycle counter
    elapsed: u16,
    /// Length of the simulated half-cycle
    half_cycle_ticks: u16,
    /// When set the sense input reads a constant high level
    sense_lost: bool,
}

impl BenchSensor {
    fn new() -> Self {
        Self {
            mains_ticks: 0,
            elapsed: 0,
            half_cycle_ticks: HALF_CYCLE_50HZ,
            sense_lost: false,
        }
    }

    /// Advance the simulated mains and the cycle counter.
    fn advance(&mut self, ticks: u16) {
        self.mains_ticks = (self.mains_ticks + ticks) % self.half_cycle_ticks;
        self.elapsed = self.elapsed.saturating_add(ticks);
    }
}

impl CycleSensor for BenchSensor {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn sample_zero_cross(&mut self) -> u8 {
        if self.sense_lost {
            return 200;
        }
        let phase = f32::from(self.mains_ticks) / f32::from(self.half_cycle_ticks);
        let level = (std::f32::consts::PI * phase).sin().abs() * 255.0;
        level.min(255.0) as u8
    }

    fn elapsed_ticks(&self) -> u16 {
        self.elapsed
    }

    fn restart_cycle(&mut self) {
        self.elapsed = 0;
    }
}

/// Simulated gate and status lines.
#[derive(Default)]
struct BenchOutput {
    gates: [bool; CHANNEL_COUNT],
    status: bool,
}

impl OutputDriver for BenchOutput {
    fn set_gate(&mut self, channel: usize, active: bool) {
        self.gates[channel] = active;
    }

    fn set_status(&mut self, lit: bool) {
        self.status = lit;
    }
}

/// Simulated serial receiver hardware.
#[derive(Default)]
struct BenchReceiver {
    restarts: usize,
    watchdog_feeds: usize,
}

impl ReceiverDriver for BenchReceiver {
    fn restart(&mut self) {
        self.restarts += 1;
    }

    fn feed_watchdog(&mut self) {
        self.watchdog_feeds += 1;
    }
}

struct PreviewApp {
    /// The dimmer core under test
    dimmer: Dimmer<'static, COMMAND_MAILBOX_SIZE>,
    /// Receive-path decoder fed by the sliders
    decoder: CommandDecoder<'static, COMMAND_MAILBOX_SIZE>,
    /// Simulated serial receiver
    rx: BenchReceiver,
    /// Simulated sense input
    sense: BenchSensor,
    /// Simulated output lines
    out: BenchOutput,

    // UI state (tracked to detect changes and send command frames)
    /// Commanded magnitude per channel (0 = off)
    levels: [u8; CHANNEL_COUNT],
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether the simulation is running
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// Half-cycle boundaries seen so far
    half_cycles: u64,
    /// Boundaries forced by the staleness ceiling
    forced: u64,
    /// Tick at which each channel fired in the current half-cycle
    fired_at: [Option<u16>; CHANNEL_COUNT],
}

impl PreviewApp {
    fn new() -> Self {
        Self {
            dimmer: Dimmer::new(COMMANDS.receiver(), &FAULT, Calibration::default()),
            decoder: CommandDecoder::new(COMMANDS.sender(), &FAULT, Calibration::default()),
            rx: BenchReceiver::default(),
            sense: BenchSensor::new(),
            out: BenchOutput::default(),
            levels: [0; CHANNEL_COUNT],
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            half_cycles: 0,
            forced: 0,
            fired_at: [None; CHANNEL_COUNT],
        }
    }

    /// Push one command frame through the receive path.
    fn send_level(&mut self, channel: usize, magnitude: u8) {
        let raw = Command { channel, magnitude }.encode();
        self.decoder.on_event(&mut self.rx, Ok(raw));
    }

    /// Push a corrupted byte through the receive path.
    fn send_corrupt_byte(&mut self) {
        self.decoder.on_event(&mut self.rx, Err(RxFault::Framing));
    }

    /// Convert wall-clock time since the previous frame into ticks.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn update_time(&mut self) -> u64 {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if !self.playing {
            return 0;
        }

        let ticks_f64 = delta.as_secs_f64() * TICKS_PER_SECOND * f64::from(self.time_scale);
        let ticks_f64 = if ticks_f64.is_finite() {
            ticks_f64.clamp(0.0, MAX_FRAME_TICKS as f64)
        } else {
            0.0
        };
        ticks_f64 as u64
    }

    /// Run the control loop over `ticks` of simulated time.
    fn step_simulation(&mut self, ticks: u64) {
        let mut remaining = ticks;
        while remaining >= u64::from(STEP_TICKS) {
            self.sense.advance(STEP_TICKS);
            if let Some(boundary) = self.dimmer.run(&mut self.sense, &mut self.out) {
                self.half_cycles += 1;
                if boundary == Boundary::Forced {
                    self.forced += 1;
                }
                self.fired_at = [None; CHANNEL_COUNT];
            }
            for (channel, fired) in self.fired_at.iter_mut().enumerate() {
                if fired.is_none() && self.out.gates[channel] {
                    *fired = Some(self.sense.elapsed);
                }
            }
            remaining -= u64::from(STEP_TICKS);
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let ticks = self.update_time();
        self.step_simulation(ticks);

        // Request continuous repaint to keep the simulation moving
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <PlaybackControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.playing = !self.playing;
                        }

                        ui.add_space(8.0);

                        ui.label("Speed:");
                        ui.add(
                            egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true),
                        );
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Mains:");
                        let old_half_cycle = self.sense.half_cycle_ticks;
                        ui.selectable_value(
                            &mut self.sense.half_cycle_ticks,
                            HALF_CYCLE_50HZ,
                            "50 Hz",
                        );
                        ui.selectable_value(
                            &mut self.sense.half_cycle_ticks,
                            HALF_CYCLE_60HZ,
                            "60 Hz",
                        );
                        if self.sense.half_cycle_ticks != old_half_cycle {
                            self.sense.mains_ticks = 0;
                        }

                        ui.add_space(8.0);

                        ui.checkbox(&mut self.sense.sense_lost, "Lose sense signal");
                    });
                });
                // </PlaybackControls>

                ui.add_space(16.0);

                // <ReceivePath>
                ui.vertical(|ui| {
                    if ui.button("Corrupt next byte").clicked() {
                        self.send_corrupt_byte();
                    }

                    ui.add_space(4.0);

                    let restarts = self.rx.restarts;
                    let feeds = self.rx.watchdog_feeds;
                    ui.label(format!("Receiver restarts: {restarts}"));
                    ui.label(format!("Watchdog feeds: {feeds}"));
                });
                // </ReceivePath>

                ui.add_space(16.0);

                ui.vertical(|ui| {
                    let half_cycles = self.half_cycles;
                    let forced = self.forced;
                    ui.label(format!("Half-cycles: {half_cycles}"));
                    ui.label(format!("Forced boundaries: {forced}"));
                });
            });

            ui.add_space(16.0);

            // === Channel bars ===
            let half_cycle = self.sense.half_cycle_ticks;
            for channel in 0..CHANNEL_COUNT {
                ui.horizontal(|ui| {
                    ui.label(format!("Ch {channel}"));
                    let old_level = self.levels[channel];
                    ui.add(egui::Slider::new(&mut self.levels[channel], 0..=MAGNITUDE_MAX));
                    if self.levels[channel] != old_level {
                        self.send_level(channel, self.levels[channel]);
                    }

                    let delay = self.dimmer.channel(channel).active_delay();
                    ui.label(format!("delay {delay} ticks"));
                });

                let (response, painter) = ui.allocate_painter(
                    egui::vec2(ui.available_width(), BAR_HEIGHT),
                    egui::Sense::hover(),
                );
                let rect = response.rect;
                painter.rect_filled(rect, 3.0, egui::Color32::from_gray(28));

                let state = self.dimmer.channel(channel);
                if state.setpoint().is_on() && state.active_delay() < half_cycle {
                    let frac = f32::from(state.active_delay()) / f32::from(half_cycle);
                    let lit = egui::Rect::from_min_max(
                        egui::pos2(rect.min.x + frac * rect.width(), rect.min.y),
                        rect.max,
                    );
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let level = ((1.0 - frac) * 255.0) as u8;
                    painter.rect_filled(lit, 3.0, egui::Color32::from_rgb(level, level / 2, 0));
                }

                let target = state.setpoint().target();
                if state.setpoint().is_on() && target < half_cycle {
                    let x = rect.min.x
                        + (f32::from(target) / f32::from(half_cycle)) * rect.width();
                    painter.line_segment(
                        [egui::pos2(x, rect.center().y), egui::pos2(x, rect.max.y)],
                        egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255)),
                    );
                }

                if let Some(fired) = self.fired_at[channel] {
                    let x = rect.min.x
                        + (f32::from(fired) / f32::from(half_cycle)).min(1.0) * rect.width();
                    painter.line_segment(
                        [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
                        egui::Stroke::new(2.0, egui::Color32::WHITE),
                    );
                }

                let x = rect.min.x
                    + (f32::from(self.sense.elapsed) / f32::from(half_cycle)).min(1.0)
                        * rect.width();
                painter.line_segment(
                    [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
                    egui::Stroke::new(1.0, egui::Color32::from_gray(90)),
                );

                ui.add_space(4.0);
            }

            ui.add_space(8.0);

            // === Status line ===
            ui.horizontal(|ui| {
                let (response, painter) =
                    ui.allocate_painter(egui::vec2(18.0, 18.0), egui::Sense::hover());
                let color = if self.out.status {
                    egui::Color32::from_rgb(220, 40, 40)
                } else {
                    egui::Color32::from_gray(45)
                };
                painter.circle_filled(response.rect.center(), 7.0, color);

                ui.label(if FAULT.is_raised() {
                    "Status: receive fault latched"
                } else {
                    "Status: heartbeat"
                });
            });
        });
    }
}
