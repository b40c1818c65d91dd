use nalgebra::Vector3;

use super::AircraftConfig;
use crate::components::{
    AeroAxis, AeroConfig, AeroGeometry, AeroTerm, AeroVariable, BrakeGroup, ControlLimits,
    EngineConfig, EngineKind, FuelTank, GearConfig, GovernorConfig, GroundConfig, MassConfig,
    PistonConfig, PointMass, PropellerConfig, PropulsionConfig, RotationSense, SpoolConfig,
    TurbineConfig, TurbopropConfig,
};
use crate::utils::errors::ConfigError;
use crate::utils::{deg_to_rad, CoefficientTable};

use AeroAxis::*;
use AeroVariable::*;

fn table(pairs: &[(f64, f64)]) -> Result<CoefficientTable, ConfigError> {
    Ok(CoefficientTable::from_pairs(pairs)?)
}

fn point(name: &str, weight: f64, x: f64, y: f64, z: f64) -> PointMass {
    PointMass {
        name: name.to_string(),
        weight,
        location: Vector3::new(x, y, z),
    }
}

#[allow(clippy::too_many_arguments)]
fn gear(
    name: &str,
    location: [f64; 3],
    spring_k: f64,
    damping_c: f64,
    max_steer: f64,
    brake_group: BrakeGroup,
    retractable: bool,
) -> GearConfig {
    GearConfig {
        name: name.to_string(),
        location: Vector3::from(location),
        spring_k,
        damping_c,
        damping_rebound: None,
        static_friction: 0.8,
        dynamic_friction: 0.5,
        rolling_friction: 0.02,
        max_steer,
        brake_group,
        retractable,
    }
}

/// Lateral-directional derivatives shared by the presets
struct Lateral {
    cy_beta: f64,
    cy_rudder: f64,
    cl_beta: f64,
    cl_p: f64,
    cl_r: f64,
    cl_aileron: f64,
    cl_rudder: f64,
    cn_beta: f64,
    cn_p: f64,
    cn_r: f64,
    cn_aileron: f64,
    cn_rudder: f64,
}

impl Lateral {
    fn terms(&self) -> Vec<AeroTerm> {
        vec![
            AeroTerm::derivative("CYb", Side, self.cy_beta, Beta),
            AeroTerm::derivative("CYdr", Side, self.cy_rudder, Rudder),
            AeroTerm::derivative("Clb", Roll, self.cl_beta, Beta),
            AeroTerm::derivative("Clp", Roll, self.cl_p, RollRate),
            AeroTerm::derivative("Clr", Roll, self.cl_r, YawRate),
            AeroTerm::derivative("Clda", Roll, self.cl_aileron, Aileron),
            AeroTerm::derivative("Cldr", Roll, self.cl_rudder, Rudder),
            AeroTerm::derivative("Cnb", Yaw, self.cn_beta, Beta),
            AeroTerm::derivative("Cnp", Yaw, self.cn_p, RollRate),
            AeroTerm::derivative("Cnr", Yaw, self.cn_r, YawRate),
            AeroTerm::derivative("Cnda", Yaw, self.cn_aileron, Aileron),
            AeroTerm::derivative("Cndr", Yaw, self.cn_rudder, Rudder),
        ]
    }
}

impl AircraftConfig {
    /// Four-seat, fixed-gear, fixed-pitch piston single
    pub fn light_single() -> Result<Self, ConfigError> {
        let mut mass = MassConfig::new(1620.0, 948.0, 1346.0, 1967.0, 0.0);
        mass.empty_cg = Vector3::new(0.1, 0.0, 0.4);
        mass.point_masses = vec![
            point("pilot", 170.0, 0.6, -0.8, 0.5),
            point("passenger", 170.0, 0.6, 0.8, 0.5),
        ];

        let mut terms = vec![
            AeroTerm::constant("CD0", Drag, 0.027),
            AeroTerm::tabulated(
                "CDalpha",
                Drag,
                vec![Alpha],
                table(&[
                    (-0.5, 0.2),
                    (-0.2, 0.0214),
                    (0.0, 0.0055),
                    (0.1, 0.0342),
                    (0.2, 0.0871),
                    (0.25, 0.1228),
                    (0.3, 0.155),
                    (0.5, 0.35),
                    (1.57, 1.2),
                ])?,
            ),
            AeroTerm::derivative("CDbeta", Drag, 0.15, AbsBeta),
            AeroTerm::derivative("CDflaps", Drag, 0.06, Flaps),
            AeroTerm::tabulated(
                "CLalpha",
                Lift,
                vec![Alpha],
                table(&[
                    (-0.5, -0.9),
                    (-0.2, -0.61),
                    (0.0, 0.31),
                    (0.25, 1.46),
                    (0.3, 1.35),
                    (0.6, 0.9),
                    (1.57, 0.0),
                ])?,
            ),
            AeroTerm::derivative("CLde", Lift, 0.43, Elevator),
            AeroTerm::derivative("CLq", Lift, 3.9, PitchRate),
            AeroTerm::derivative("CLadot", Lift, 1.7, AlphaRate),
            AeroTerm::derivative("CLflaps", Lift, 0.5, Flaps),
            AeroTerm::tabulated(
                "CLge",
                Lift,
                vec![HeightOverSpan],
                table(&[(0.0, 0.9), (0.1, 0.5), (0.3, 0.15), (0.6, 0.0)])?,
            )
            .with_factor(Alpha),
            AeroTerm::constant("Cm0", Pitch, 0.04),
            AeroTerm::derivative("Cmalpha", Pitch, -1.8, Alpha),
            AeroTerm::derivative("Cmde", Pitch, -1.28, Elevator),
            AeroTerm::derivative("Cmq", Pitch, -12.4, PitchRate),
            AeroTerm::derivative("Cmadot", Pitch, -7.27, AlphaRate),
            AeroTerm::derivative("Cmflaps", Pitch, -0.05, Flaps),
        ];
        terms.extend(
            Lateral {
                cy_beta: -0.31,
                cy_rudder: 0.187,
                cl_beta: -0.089,
                cl_p: -0.47,
                cl_r: 0.096,
                cl_aileron: 0.23,
                cl_rudder: 0.0147,
                cn_beta: 0.065,
                cn_p: -0.03,
                cn_r: -0.099,
                cn_aileron: -0.0053,
                cn_rudder: -0.0657,
            }
            .terms(),
        );
        let mut aero = AeroConfig::new(AeroGeometry::new(174.0, 35.8, 4.9), terms);
        aero.alpha_limits = (deg_to_rad(-60.0), deg_to_rad(60.0));

        let propeller = PropellerConfig {
            diameter: 6.25,
            gear_ratio: 1.0,
            inertia: 1.67,
            blades: 2,
            sense: RotationSense::Clockwise,
            ct_table: table(&[
                (0.0, 0.095),
                (0.2, 0.090),
                (0.4, 0.075),
                (0.6, 0.055),
                (0.8, 0.030),
                (1.0, 0.0),
                (1.2, -0.035),
            ])?,
            cp_table: table(&[
                (0.0, 0.050),
                (0.2, 0.050),
                (0.4, 0.047),
                (0.6, 0.042),
                (0.8, 0.032),
                (1.0, 0.015),
                (1.2, -0.010),
            ])?,
            fixed_pitch: 0.0,
            governor: None,
        };

        let propulsion = PropulsionConfig {
            engines: vec![EngineConfig {
                name: "O-320".to_string(),
                location: Vector3::new(6.0, 0.0, 0.5),
                pitch_angle: 0.0,
                yaw_angle: 0.0,
                feed_tanks: vec![0, 1],
                kind: EngineKind::Piston(PistonConfig {
                    max_hp: 160.0,
                    max_rpm: 2700.0,
                    displacement: 320.0,
                    volumetric_efficiency: 0.85,
                    idle_map_fraction: 0.3,
                    friction_fraction: 0.1,
                    starter_hp: 3.0,
                    catch_rpm: 400.0,
                    propeller,
                }),
            }],
            tanks: vec![
                FuelTank::new("left", 162.0, 162.0, Vector3::new(0.0, -5.0, -2.5)),
                FuelTank::new("right", 162.0, 162.0, Vector3::new(0.0, 5.0, -2.5)),
            ],
        };

        let ground = GroundConfig {
            units: vec![
                gear("nose", [5.0, 0.0, 4.0], 1800.0, 600.0, 10.0, BrakeGroup::None, false),
                gear("left_main", [-1.3, -3.6, 4.3], 5400.0, 1600.0, 0.0, BrakeGroup::Left, false),
                gear("right_main", [-1.3, 3.6, 4.3], 5400.0, 1600.0, 0.0, BrakeGroup::Right, false),
            ],
            ..Default::default()
        };

        Ok(Self {
            name: "light_single".to_string(),
            mass,
            pilot_eye: Vector3::new(2.0, -0.8, -2.0),
            aero,
            propulsion,
            ground,
            limits: ControlLimits {
                elevator_max: 28.0,
                aileron_max: 20.0,
                rudder_max: 16.0,
                flap_travel_time: 6.0,
            },
        })
    }

    /// Single-engine afterburning fighter with retractable gear
    pub fn jet() -> Result<Self, ConfigError> {
        let mut mass = MassConfig::new(18000.0, 9496.0, 55814.0, 63100.0, 982.0);
        mass.empty_cg = Vector3::new(0.0, 0.0, 0.3);
        mass.point_masses = vec![point("pilot", 250.0, 12.0, 0.0, -1.0)];

        let mut terms = vec![
            AeroTerm::constant("CD0", Drag, 0.02),
            AeroTerm::tabulated(
                "CDalpha",
                Drag,
                vec![Alpha],
                table(&[
                    (-0.35, 0.133),
                    (-0.1, 0.004),
                    (0.0, 0.0003),
                    (0.1, 0.022),
                    (0.2, 0.068),
                    (0.35, 0.208),
                    (0.5, 0.4),
                    (1.57, 1.5),
                ])?,
            ),
            AeroTerm::derivative("CDbeta", Drag, 0.3, AbsBeta),
            AeroTerm::derivative("CDsb", Drag, 0.08, Speedbrake),
            AeroTerm::derivative("CDgear", Drag, 0.02, Gear),
            AeroTerm::tabulated(
                "CLalpha",
                Lift,
                vec![Alpha, Mach],
                CoefficientTable::from_rows(
                    vec![-0.35, -0.1, 0.0, 0.35, 0.45, 0.7, 1.57],
                    vec![0.0, 0.8, 1.2, 2.0],
                    &[
                        vec![-1.0, -1.1, -0.9, -0.7],
                        vec![-0.25, -0.28, -0.22, -0.18],
                        vec![0.05, 0.05, 0.04, 0.03],
                        vec![1.25, 1.38, 1.05, 0.8],
                        vec![1.3, 1.4, 1.15, 0.9],
                        vec![0.9, 0.95, 0.9, 0.8],
                        vec![0.0, 0.0, 0.0, 0.0],
                    ],
                )?,
            ),
            AeroTerm::derivative("CLde", Lift, 0.5, Elevator),
            AeroTerm::derivative("CLq", Lift, 3.0, PitchRate),
            AeroTerm::constant("Cm0", Pitch, 0.0),
            AeroTerm::derivative("Cmalpha", Pitch, -0.5, Alpha),
            AeroTerm::derivative("Cmde", Pitch, -0.8, Elevator),
            AeroTerm::derivative("Cmq", Pitch, -5.0, PitchRate),
            AeroTerm::derivative("Cmadot", Pitch, -1.5, AlphaRate),
        ];
        terms.extend(
            Lateral {
                cy_beta: -1.0,
                cy_rudder: 0.2,
                cl_beta: -0.06,
                cl_p: -0.3,
                cl_r: 0.05,
                cl_aileron: 0.07,
                cl_rudder: 0.01,
                cn_beta: 0.12,
                cn_p: -0.01,
                cn_r: -0.3,
                cn_aileron: -0.003,
                cn_rudder: -0.07,
            }
            .terms(),
        );
        let mut aero = AeroConfig::new(AeroGeometry::new(300.0, 30.0, 11.32), terms);
        aero.alpha_limits = (deg_to_rad(-30.0), deg_to_rad(60.0));
        aero.beta_limits = (deg_to_rad(-30.0), deg_to_rad(30.0));

        let propulsion = PropulsionConfig {
            engines: vec![EngineConfig {
                name: "F100".to_string(),
                location: Vector3::new(-15.0, 0.0, 0.0),
                pitch_angle: 0.0,
                yaw_angle: 0.0,
                feed_tanks: vec![0],
                kind: EngineKind::Turbine(TurbineConfig {
                    mil_thrust: 14670.0,
                    max_thrust: 23770.0,
                    idle_thrust_fraction: 0.05,
                    tsfc: 0.74,
                    atsfc: 2.05,
                    augmented: true,
                    augmentation_threshold: 0.95,
                    spool: SpoolConfig {
                        idle_n1: 30.0,
                        idle_n2: 60.0,
                        max_n1: 100.0,
                        max_n2: 100.0,
                        spool_up_time: 3.0,
                        spool_down_time: 2.0,
                        starter_n2: 25.0,
                        light_off_n2: 15.0,
                    },
                    idle_lapse: None,
                    mil_lapse: None,
                    max_lapse: None,
                }),
            }],
            tanks: vec![FuelTank::new("internal", 7000.0, 3000.0, Vector3::new(1.0, 0.0, 0.0))],
        };

        let ground = GroundConfig {
            units: vec![
                gear("nose", [12.0, 0.0, 5.3], 8000.0, 1200.0, 30.0, BrakeGroup::None, true),
                gear("left_main", [-1.5, -3.8, 5.5], 30000.0, 4000.0, 0.0, BrakeGroup::Left, true),
                gear("right_main", [-1.5, 3.8, 5.5], 30000.0, 4000.0, 0.0, BrakeGroup::Right, true),
            ],
            transition_time: 4.0,
            ..Default::default()
        };

        Ok(Self {
            name: "jet".to_string(),
            mass,
            pilot_eye: Vector3::new(15.0, 0.0, -2.5),
            aero,
            propulsion,
            ground,
            limits: ControlLimits {
                elevator_max: 25.0,
                aileron_max: 21.5,
                rudder_max: 30.0,
                flap_travel_time: 2.0,
            },
        })
    }

    /// Twin turboprop with constant-speed propellers
    pub fn turboprop_twin() -> Result<Self, ConfigError> {
        let mut mass = MassConfig::new(8500.0, 18000.0, 24000.0, 40000.0, 1000.0);
        mass.empty_cg = Vector3::new(0.0, 0.0, 0.5);
        mass.point_masses = vec![
            point("crew", 400.0, 6.0, 0.0, 0.5),
            point("cabin", 800.0, -2.0, 0.0, 0.5),
        ];

        let mut terms = vec![
            AeroTerm::constant("CD0", Drag, 0.025),
            AeroTerm::tabulated(
                "CDalpha",
                Drag,
                vec![Alpha],
                table(&[
                    (-0.3, 0.06),
                    (0.0, 0.003),
                    (0.1, 0.025),
                    (0.2, 0.075),
                    (0.3, 0.15),
                    (0.6, 0.5),
                    (1.57, 1.3),
                ])?,
            ),
            AeroTerm::derivative("CDbeta", Drag, 0.2, AbsBeta),
            AeroTerm::derivative("CDflaps", Drag, 0.05, Flaps),
            AeroTerm::derivative("CDgear", Drag, 0.015, Gear),
            AeroTerm::tabulated(
                "CLalpha",
                Lift,
                vec![Alpha],
                table(&[
                    (-0.3, -1.2),
                    (-0.1, -0.3),
                    (0.0, 0.2),
                    (0.25, 1.45),
                    (0.3, 1.35),
                    (0.6, 0.9),
                    (1.57, 0.0),
                ])?,
            ),
            AeroTerm::derivative("CLde", Lift, 0.4, Elevator),
            AeroTerm::derivative("CLq", Lift, 4.0, PitchRate),
            AeroTerm::derivative("CLflaps", Lift, 0.6, Flaps),
            AeroTerm::constant("Cm0", Pitch, 0.02),
            AeroTerm::derivative("Cmalpha", Pitch, -1.2, Alpha),
            AeroTerm::derivative("Cmde", Pitch, -1.1, Elevator),
            AeroTerm::derivative("Cmq", Pitch, -15.0, PitchRate),
            AeroTerm::derivative("Cmadot", Pitch, -5.0, AlphaRate),
        ];
        terms.extend(
            Lateral {
                cy_beta: -0.6,
                cy_rudder: 0.15,
                cl_beta: -0.1,
                cl_p: -0.5,
                cl_r: 0.12,
                cl_aileron: 0.15,
                cl_rudder: 0.01,
                cn_beta: 0.12,
                cn_p: -0.04,
                cn_r: -0.15,
                cn_aileron: -0.005,
                cn_rudder: -0.08,
            }
            .terms(),
        );
        let mut aero = AeroConfig::new(AeroGeometry::new(303.0, 54.5, 5.9), terms);
        aero.alpha_limits = (deg_to_rad(-45.0), deg_to_rad(60.0));

        let propeller = PropellerConfig {
            diameter: 8.2,
            gear_ratio: 17.6,
            inertia: 6.0,
            blades: 4,
            sense: RotationSense::Clockwise,
            ct_table: CoefficientTable::from_rows(
                PROP_ADVANCE_RATIOS.to_vec(),
                PROP_BLADE_ANGLES.to_vec(),
                &PROP_CT.iter().map(|row| row.to_vec()).collect::<Vec<_>>(),
            )?,
            cp_table: CoefficientTable::from_rows(
                PROP_ADVANCE_RATIOS.to_vec(),
                PROP_BLADE_ANGLES.to_vec(),
                &PROP_CP.iter().map(|row| row.to_vec()).collect::<Vec<_>>(),
            )?,
            fixed_pitch: 20.0,
            governor: Some(GovernorConfig {
                target_rpm: 1700.0,
                gain: 0.05,
                min_pitch: 10.0,
                max_pitch: 60.0,
            }),
        };
        let engine = |name: &str, y: f64, tank: usize| EngineConfig {
            name: name.to_string(),
            location: Vector3::new(3.0, y, 0.5),
            pitch_angle: 0.0,
            yaw_angle: 0.0,
            feed_tanks: vec![tank],
            kind: EngineKind::Turboprop(TurbopropConfig {
                max_shaft_hp: 850.0,
                idle_power_fraction: 0.08,
                psfc: 0.6,
                core_rpm: 37500.0,
                spool: SpoolConfig {
                    idle_n1: 40.0,
                    idle_n2: 52.0,
                    max_n1: 100.0,
                    max_n2: 101.5,
                    spool_up_time: 2.0,
                    spool_down_time: 1.5,
                    starter_n2: 20.0,
                    light_off_n2: 13.0,
                },
                propeller: propeller.clone(),
            }),
        };

        let propulsion = PropulsionConfig {
            engines: vec![engine("left", -8.0, 0), engine("right", 8.0, 1)],
            tanks: vec![
                FuelTank::new("left", 1800.0, 1200.0, Vector3::new(0.0, -9.0, -1.0)),
                FuelTank::new("right", 1800.0, 1200.0, Vector3::new(0.0, 9.0, -1.0)),
            ],
        };

        let ground = GroundConfig {
            units: vec![
                gear("nose", [10.0, 0.0, 5.0], 6000.0, 1500.0, 20.0, BrakeGroup::None, true),
                gear("left_main", [-1.0, -8.0, 5.2], 20000.0, 4000.0, 0.0, BrakeGroup::Left, true),
                gear("right_main", [-1.0, 8.0, 5.2], 20000.0, 4000.0, 0.0, BrakeGroup::Right, true),
            ],
            transition_time: 6.0,
            ..Default::default()
        };

        Ok(Self {
            name: "turboprop_twin".to_string(),
            mass,
            pilot_eye: Vector3::new(9.0, -1.2, -1.5),
            aero,
            propulsion,
            ground,
            limits: ControlLimits::default(),
        })
    }
}

const PROP_ADVANCE_RATIOS: [f64; 8] = [0.0, 0.4, 0.8, 1.2, 1.6, 2.0, 2.4, 2.8];
const PROP_BLADE_ANGLES: [f64; 6] = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];

const PROP_CT: [[f64; 6]; 8] = [
    [0.0974, 0.1439, 0.1517, 0.1594, 0.1672, 0.1749],
    [0.0034, 0.1020, 0.1451, 0.1518, 0.1580, 0.1638],
    [-0.0908, 0.0124, 0.1147, 0.1504, 0.1561, 0.1608],
    [-0.1617, -0.0774, 0.0322, 0.1403, 0.1594, 0.1638],
    [-0.1853, -0.1701, -0.0503, 0.0673, 0.1664, 0.1712],
    [-0.2143, -0.1965, -0.1347, -0.0053, 0.1210, 0.1814],
    [-0.2490, -0.2259, -0.2068, -0.0790, 0.0602, 0.1937],
    [-0.2893, -0.2598, -0.2353, -0.1545, -0.0007, 0.1480],
];

const PROP_CP: [[f64; 6]; 8] = [
    [0.0057, 0.0153, 0.0312, 0.0535, 0.0822, 0.1173],
    [0.0040, 0.0470, 0.0745, 0.0940, 0.1200, 0.1525],
    [-0.0668, 0.0130, 0.0995, 0.1403, 0.1645, 0.1954],
    [-0.1775, -0.0871, 0.0426, 0.1795, 0.2187, 0.2492],
    [-0.2591, -0.2563, -0.0750, 0.1140, 0.2848, 0.3158],
    [-0.3568, -0.3577, -0.2561, -0.0050, 0.2544, 0.3964],
    [-0.4733, -0.4745, -0.4666, -0.1795, 0.1537, 0.4915],
    [-0.6103, -0.6111, -0.6021, -0.4114, 0.0073, 0.4360],
];
