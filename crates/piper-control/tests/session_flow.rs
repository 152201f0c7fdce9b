//! 交互会话端到端流程

mod common;

use common::{START, mock_arm, run_session};
use piper_control::{
    ArmController, GripperModel, InteractiveSession, ParseError, ParsedCommand, ScriptedInput,
    SessionState, parse_gripper, parse_main,
};
use piper_driver::{DriverCall, FailOn, JointVector, MockDriver};

#[test]
fn test_startup_sequence() {
    let mut arm = mock_arm();
    arm.initialize().unwrap();
    arm.set_start_position().unwrap();

    assert_eq!(
        arm.driver().calls(),
        &[DriverCall::Reset, DriverCall::SetJointPositions(START)]
    );
    assert_eq!(arm.get_absolute().unwrap(), START);
    assert_eq!(arm.get_relative().unwrap(), JointVector::ZERO);
}

#[test]
fn test_absolute_degrees_command() {
    let mut arm = mock_arm();
    run_session(&mut arm, &["45 -30 15 10 -70 45d", "q"]);
    assert_eq!(
        arm.current_command(),
        JointVector::new([0.785, -0.524, 0.262, 0.175, -1.222, 0.785])
    );
}

#[test]
fn test_relative_negative_first_command() {
    let mut arm = mock_arm();
    run_session(&mut arm, &["+-0.1 0 -0.2 0 0.3 0", "q"]);
    assert_eq!(
        arm.current_command(),
        JointVector::new([-1.693, 0.634, -0.486, 0.0, 0.685, -1.85])
    );
}

#[test]
fn test_relative_command_printed_back() {
    let mut arm = mock_arm();
    let out = run_session(&mut arm, &["+0.1 0 -0.2 0 0.3 0", "q"]);
    assert!(out.contains("Relative to start (rad): [0.1, 0, -0.2, 0, 0.3, 0]"));
}

#[test]
fn test_gripper_scenario() {
    assert_eq!(
        parse_gripper("1.5"),
        ParsedCommand::Invalid(ParseError::OutOfRange { value: 1.5 })
    );
    assert_eq!(parse_gripper("0.5"), ParsedCommand::GripperSetPosition(0.5));

    let mut arm = mock_arm();
    let out = run_session(&mut arm, &["g", "o", "c", "0.5", "b", "q"]);

    let gripper_writes: Vec<f64> = arm
        .driver()
        .calls()
        .iter()
        .filter_map(|c| match c {
            DriverCall::SetGripperCtrl(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(gripper_writes, vec![0.07, 0.0, 0.035]);

    assert!(out.contains("Gripper opened fully"));
    assert!(out.contains("Gripper closed fully"));
    assert!(out.contains("Gripper set to 0.50"));
    assert!(out.contains("Current gripper: 0.50 (0=closed, 1=open)"));
}

#[test]
fn test_gripper_menu_ignores_joint_commands() {
    let mut arm = mock_arm();
    let out = run_session(&mut arm, &["g", "0 0 0 0 0 0", "q", "b", "q"]);
    assert_eq!(arm.driver().write_count(), 0);
    assert_eq!(
        out.matches("Invalid input. Enter number 0-1 or o/c/b").count(),
        2
    );
}

#[test]
fn test_invalid_inputs_leave_command_unchanged() {
    let mut arm = mock_arm();
    arm.set_absolute(JointVector::new([0.5; 6])).unwrap();
    let before = arm.current_command();

    for line in ["1 2 3 4 5", "1 2 3 4 5 6 7", "1 2 three 4 5 6", "", "inf 0 0 0 0 0"] {
        assert!(matches!(parse_main(line), ParsedCommand::Invalid(_)));
    }
    run_session(
        &mut arm,
        &["1 2 3 4 5", "1 2 3 4 5 6 7", "1 2 three 4 5 6", "", "q"],
    );
    assert_eq!(arm.current_command(), before);
}

#[test]
fn test_session_recovers_from_driver_failure() {
    let mut arm = mock_arm();
    arm.driver_mut().fail_next(FailOn::SetGripperCtrl);
    let mut session = InteractiveSession::new(
        &mut arm,
        ScriptedInput::new(["g", "o", "o"]),
        Vec::new(),
    );

    assert_eq!(session.step().unwrap(), SessionState::GripperMenu);
    assert_eq!(session.step().unwrap(), SessionState::GripperMenu);
    assert_eq!(session.step().unwrap(), SessionState::GripperMenu);
    // 输入耗尽
    assert_eq!(session.step().unwrap(), SessionState::Terminated);

    let out = String::from_utf8(session.into_output()).unwrap();
    assert!(out.contains("Command failed"));
    assert_eq!(out.matches("Gripper opened fully").count(), 1);
    assert_eq!(arm.get_gripper().unwrap(), 1.0);
}

#[test]
fn test_custom_gripper_extent() {
    let mut arm = ArmController::new(
        MockDriver::new().with_gripper(0.05),
        START,
        GripperModel::new(0.1, 0.0),
    );
    assert_eq!(arm.get_gripper().unwrap(), 0.5);
    arm.set_gripper(0.25).unwrap();
    assert_eq!(arm.driver().last_gripper_command(), Some(0.025));
}

#[test]
fn test_overflowing_joint_value_is_rejected() {
    let mut arm = mock_arm();
    arm.initialize().unwrap();
    arm.driver_mut().clear_calls();
    let out = run_session(&mut arm, &["1e306 0 0 0 0 0", "q"]);

    assert!(out.contains("Invalid input: Joint value '1e306' is not finite"));
    assert_eq!(arm.current_command(), START);
    assert_eq!(arm.driver().write_count(), 0);
    assert!(arm.driver().read_count() > 0);
}
