use super::*;
use crate::config::{FilterConfig, ProcessNoise};
use crate::error::FilterError;
use crate::matrix::{Matrix, SingularMatrixError};
use approx::{assert_abs_diff_eq, assert_relative_eq};

fn single() -> FilterState<f64, 1> {
    FilterState::new(0.01, &FilterConfig::<f64>::single_barometer())
}

fn triple() -> FilterState<f64, 3> {
    FilterState::new(0.01, &FilterConfig::<f64>::triple_barometer())
}

fn assert_matrix_eq<const R: usize, const C: usize>(
    actual: &Matrix<f64, R, C>,
    expected: &Matrix<f64, R, C>,
    epsilon: f64,
) {
    for i in 0..R {
        for j in 0..C {
            assert_abs_diff_eq!(actual[(i, j)], expected[(i, j)], epsilon = epsilon);
        }
    }
}

#[test]
fn test_initialization() {
    let filter = single();
    assert_eq!(filter.corrected_state().to_column(), [0.0; 3]);
    assert_eq!(filter.predicted_state().to_column(), [0.0; 3]);
    assert_eq!(
        *filter.corrected_covariance(),
        Matrix::from_diagonal([0.1; 3])
    );
    assert_eq!(*filter.gain(), Matrix::zeros());
    assert_eq!(filter.measurement_noise_covariance()[(0, 0)], 9.0);
    assert_eq!(filter.sampling_period(), 0.01);

    let a = filter.state_transition();
    assert_eq!(a[(0, 1)], 0.01);
    assert_relative_eq!(a[(0, 2)], 0.00005, max_relative = 1e-12);
    assert_eq!(a[(1, 2)], 0.01);
    assert_eq!(a[(2, 0)], 0.0);

    let triple = triple();
    assert_eq!(
        *triple.observation_matrix(),
        Matrix::from_rows([[1.0, 0.0, 0.0]; 3])
    );
    assert_eq!(
        *triple.measurement_noise_covariance(),
        Matrix::from_diagonal([0.1; 3])
    );
}

#[test]
fn test_scalar_process_noise_contribution() {
    let config = FilterConfig {
        process_noise: ProcessNoise::Acceleration(2.0),
        ..FilterConfig::<f64>::triple_barometer()
    };
    let filter = FilterState::<f64, 3>::new(0.1, &config);
    let gqg = filter.process_noise_contribution();

    assert_relative_eq!(gqg[(0, 0)], 5e-5, max_relative = 1e-9);
    assert_relative_eq!(gqg[(0, 1)], 1e-3, max_relative = 1e-9);
    assert_relative_eq!(gqg[(1, 0)], 1e-3, max_relative = 1e-9);
    assert_relative_eq!(gqg[(1, 1)], 0.02, max_relative = 1e-9);
    assert_eq!(gqg[(2, 2)], 0.0);
    assert_eq!(gqg[(0, 2)], 0.0);
}

#[test]
fn test_offset_process_noise_contribution() {
    let filter = FilterState::<f64, 1>::new(0.1, &FilterConfig::<f64>::single_barometer());
    let gqg = filter.process_noise_contribution();

    assert_relative_eq!(gqg[(0, 0)], 0.004 * 0.01 + 1e-6 * 0.000025, max_relative = 1e-9);
    assert_relative_eq!(gqg[(0, 1)], 0.004 * 0.1 + 1e-6 * 0.0005, max_relative = 1e-9);
    assert_relative_eq!(gqg[(1, 1)], 0.004 + 1e-6 * 0.01, max_relative = 1e-9);
    assert_relative_eq!(gqg[(0, 2)], 1e-6 * 0.005, max_relative = 1e-9);
    assert_relative_eq!(gqg[(1, 2)], 1e-6 * 0.1, max_relative = 1e-9);
    assert_relative_eq!(gqg[(2, 2)], 1e-6, max_relative = 1e-9);
    assert_eq!(*gqg, gqg.transpose());
}

#[test]
fn test_predict_from_rest() {
    let config = FilterConfig {
        process_noise: ProcessNoise::Acceleration(0.0),
        ..FilterConfig::<f64>::single_barometer()
    };
    let mut filter = FilterState::<f64, 1>::new(0.1, &config);
    filter.predict(2.0);

    let x_hat = filter.predicted_state().to_column();
    assert_relative_eq!(x_hat[0], 0.01, max_relative = 1e-12);
    assert_relative_eq!(x_hat[1], 0.2, max_relative = 1e-12);
    assert_eq!(x_hat[2], 0.0);

    // P = 0.1·A·Aᵀ
    let p_hat = filter.predicted_covariance();
    assert_relative_eq!(p_hat[(0, 0)], 0.1010025, max_relative = 1e-12);
    assert_relative_eq!(p_hat[(1, 1)], 0.101, max_relative = 1e-12);
    assert_relative_eq!(p_hat[(2, 2)], 0.1, max_relative = 1e-12);
    assert_relative_eq!(p_hat[(0, 1)], 0.01005, max_relative = 1e-12);

    // The corrected values are untouched until the update.
    assert_eq!(filter.corrected_state().to_column(), [0.0; 3]);
}

#[test]
fn test_single_update() {
    let mut filter = single();
    filter.update(&[9.1]).unwrap();

    let gain = 0.1 / 9.1;
    assert_relative_eq!(filter.gain()[(0, 0)], gain, max_relative = 1e-12);
    assert_eq!(filter.gain()[(1, 0)], 0.0);
    assert_relative_eq!(filter.estimate().altitude, 0.1, max_relative = 1e-12);
    assert_eq!(filter.estimate().velocity, 0.0);
    assert_relative_eq!(
        filter.corrected_covariance()[(0, 0)],
        0.1 * 9.0 / 9.1,
        max_relative = 1e-12
    );
    assert_eq!(filter.corrected_covariance()[(1, 1)], 0.1);
}

#[test]
fn test_eliminated_sensor_is_ignored() {
    let mut filter = triple();
    filter
        .update_active(&[true, false, true], &[1.0, 1000.0, 1.0])
        .unwrap();

    let mut other = triple();
    other
        .update_active(&[true, false, true], &[1.0, -50.0, 1.0])
        .unwrap();

    assert_eq!(filter.estimate(), other.estimate());

    let (p, r) = (1e-5, 0.1);
    let expected_gain = p / (2.0 * p + r);
    assert_relative_eq!(filter.gain()[(0, 0)], expected_gain, max_relative = 1e-9);
    assert_relative_eq!(filter.gain()[(0, 2)], expected_gain, max_relative = 1e-9);
    assert_eq!(filter.gain()[(0, 1)], 0.0);
    assert_relative_eq!(
        filter.estimate().altitude,
        2.0 * expected_gain,
        max_relative = 1e-9
    );
}

#[test]
fn test_full_update_matches_single_reading_with_reduced_noise() {
    // Three identical readings with noise r equal one reading with noise r/3.
    let mut full = triple();
    full.update(&[2.0; 3]).unwrap();

    let config = FilterConfig {
        measurement_noise: 0.1 / 3.0,
        ..FilterConfig::<f64>::triple_barometer()
    };
    let mut reduced = FilterState::<f64, 1>::new(0.01, &config);
    reduced.update(&[2.0]).unwrap();

    assert_relative_eq!(
        full.estimate().altitude,
        reduced.estimate().altitude,
        max_relative = 1e-9
    );
    assert_matrix_eq(
        full.corrected_covariance(),
        reduced.corrected_covariance(),
        1e-15,
    );
}

#[test]
fn test_no_active_observations() {
    let mut filter = triple();
    assert_eq!(
        filter.update_active(&[false; 3], &[1.0; 3]),
        Err(FilterError::NoActiveObservations)
    );
    assert_eq!(filter.estimate().altitude, 0.0);
}

#[test]
fn test_singular_innovation_rolls_back() {
    let mut filter = triple();
    filter.predict(1.0);
    filter.update(&[0.1, 0.2, 0.3]).unwrap();

    let gain = *filter.gain();
    let x_bar = *filter.corrected_state();
    let p_bar = *filter.corrected_covariance();
    assert_ne!(gain, Matrix::zeros());

    // Without measurement noise every row of S equals P₀₀.
    filter.set_measurement_noise(0.0);
    filter.predict(1.0);
    assert_eq!(
        filter.update(&[0.1, 0.2, 0.3]),
        Err(FilterError::SingularInnovation(SingularMatrixError))
    );

    assert_eq!(*filter.gain(), gain);
    assert_eq!(*filter.corrected_state(), x_bar);
    assert_eq!(*filter.corrected_covariance(), p_bar);
    assert_eq!(filter.measurement_noise(), 0.0);
}

#[test]
fn test_freeze_and_trust_prediction() {
    let mut filter = single();
    filter.predict(3.0);
    filter.update(&[0.5]).unwrap();

    filter.freeze_prediction();
    assert_eq!(filter.predicted_state(), filter.corrected_state());
    assert_eq!(filter.predicted_covariance(), filter.corrected_covariance());

    filter.predict(3.0);
    filter.trust_prediction();
    assert_eq!(filter.predicted_state(), filter.corrected_state());
    assert_eq!(filter.predicted_covariance(), filter.corrected_covariance());
}

#[test]
fn test_reset() {
    let mut filter = single();
    for _ in 0..10 {
        filter.predict(5.0);
        filter.update(&[1.0]).unwrap();
    }
    assert_ne!(filter.estimate().velocity, 0.0);

    filter.reset();
    assert_eq!(filter.corrected_state().to_column(), [0.0; 3]);
    assert_eq!(filter.predicted_state().to_column(), [0.0; 3]);
    assert_eq!(
        *filter.corrected_covariance(),
        Matrix::from_diagonal([0.1; 3])
    );
    assert_eq!(*filter.gain(), Matrix::zeros());
}

#[test]
fn test_reset_for_ignition() {
    let mut filter = single();
    for _ in 0..10 {
        filter.predict(5.0);
        filter.update(&[1.0]).unwrap();
    }

    let state = *filter.corrected_state();
    let offset_variance = filter.corrected_covariance()[(2, 2)];
    assert_ne!(filter.corrected_covariance()[(0, 1)], 0.0);

    filter.reset_for_ignition();
    assert_eq!(*filter.corrected_state(), state);
    assert_eq!(*filter.predicted_state(), state);
    assert_eq!(
        *filter.corrected_covariance(),
        Matrix::from_diagonal([0.1, 0.1, offset_variance])
    );
    assert_eq!(filter.predicted_covariance(), filter.corrected_covariance());
}

#[test]
fn test_covariance_converges_monotonically() {
    let config = FilterConfig {
        initial_covariance: 100.0,
        ..FilterConfig::<f64>::triple_barometer()
    };
    let mut filter = FilterState::<f64, 3>::new(0.01, &config);

    let initial_trace = filter.corrected_covariance().trace();
    let mut trace = initial_trace;
    let mut altitude_variance = filter.corrected_covariance()[(0, 0)];

    for _ in 0..300 {
        filter.predict(0.0);
        filter.update(&[0.0; 3]).unwrap();

        let p_bar = filter.corrected_covariance();
        assert!(p_bar.trace() <= trace * (1.0 + 1e-4));
        assert!(p_bar[(0, 0)] <= altitude_variance * (1.0 + 1e-4));
        trace = p_bar.trace();
        altitude_variance = p_bar[(0, 0)];
    }

    assert!(trace < initial_trace * 1e-2);
    assert_eq!(filter.corrected_state().to_column(), [0.0; 3]);
}

#[test]
fn test_single_precision_filter() {
    let mut filter = FilterState::<f32, 1>::new(0.01, &FilterConfig::<f32>::single_barometer());
    for tick in 1..=50 {
        let t = tick as f32 * 0.01;
        filter.predict(1.0);
        filter.update(&[0.5 * t * t]).unwrap();
    }

    assert_abs_diff_eq!(filter.estimate().velocity, 0.5, epsilon = 1e-3);
    assert_abs_diff_eq!(filter.estimate().altitude, 0.125, epsilon = 1e-3);
}

/// Cross-checks the filter against the `minikalman` reference implementation.
mod reference {
    use super::*;
    use minikalman::buffers::types::*;
    use minikalman::prelude::*;
    use minikalman::regular::{ControlBuilder, RegularKalmanBuilder, RegularObservationBuilder};

    const OBSERVATIONS: usize = 1;
    const CONTROLS: usize = 1;

    #[test]
    fn test_matches_reference_filter() {
        let dt = 0.1_f64;
        let config = FilterConfig {
            process_noise: ProcessNoise::Acceleration(0.0),
            initial_covariance: 0.5,
            measurement_noise: 4.0,
            noise_schedule: None,
            ..FilterConfig::<f64>::single_barometer()
        };
        let mut filter = FilterState::<f64, 1>::new(dt, &config);

        let zero = 0.0_f64;

        let state_vec =
            StateVectorBuffer::<STATES, f64, _>::new(MatrixData::new_array::<STATES, 1, STATES, f64>(
                [zero; STATES],
            ));

        let mut state_transition =
            StateTransitionMatrixMutBuffer::<STATES, f64, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                f64,
            >(
                [zero; { STATES * STATES }]
            ));
        state_transition.apply(|mat| {
            for i in 0..STATES {
                for j in 0..STATES {
                    mat.set_at(i, j, filter.state_transition()[(i, j)]);
                }
            }
        });

        let mut estimate_covariance =
            EstimateCovarianceMatrixBuffer::<STATES, f64, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                f64,
            >(
                [zero; { STATES * STATES }]
            ));
        estimate_covariance.make_scalar(0.5);

        let mut process_noise = DirectProcessNoiseCovarianceMatrixMutBuffer::<STATES, f64, _>::new(
            MatrixData::new_array::<STATES, STATES, { STATES * STATES }, f64>(
                [zero; { STATES * STATES }],
            ),
        );
        process_noise.make_scalar(0.0);

        let predicted_state =
            PredictedStateEstimateVectorBuffer::<STATES, f64, _>::new(MatrixData::new_array::<
                STATES,
                1,
                STATES,
                f64,
            >([zero; STATES]));

        let temp_state_matrix =
            TemporaryStateMatrixBuffer::<STATES, f64, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                f64,
            >(
                [zero; { STATES * STATES }]
            ));

        let mut reference = RegularKalmanBuilder::new::<STATES, f64>(
            state_transition,
            state_vec,
            estimate_covariance,
            process_noise,
            predicted_state,
            temp_state_matrix,
        );

        let control_vector = ControlVectorBuffer::<CONTROLS, f64, _>::new(MatrixData::new_array::<
            CONTROLS,
            1,
            CONTROLS,
            f64,
        >([zero; CONTROLS]));

        let mut control_matrix =
            ControlMatrixMutBuffer::<STATES, CONTROLS, f64, _>::new(MatrixData::new_array::<
                STATES,
                CONTROLS,
                { STATES * CONTROLS },
                f64,
            >(
                [zero; STATES * CONTROLS]
            ));
        control_matrix.apply(|mat| {
            for i in 0..STATES {
                mat.set_at(i, 0, filter.control_input()[(i, 0)]);
            }
        });

        let mut control_noise = ControlProcessNoiseCovarianceMatrixMutBuffer::<CONTROLS, f64, _>::new(
            MatrixData::new_array::<CONTROLS, CONTROLS, { CONTROLS * CONTROLS }, f64>(
                [zero; CONTROLS * CONTROLS],
            ),
        );
        control_noise.make_scalar(0.0);

        let temp_bq = TemporaryBQMatrixBuffer::<STATES, CONTROLS, f64, _>::new(MatrixData::new_array::<
            STATES,
            CONTROLS,
            { STATES * CONTROLS },
            f64,
        >(
            [zero; STATES * CONTROLS],
        ));

        let mut control = ControlBuilder::new::<STATES, CONTROLS, f64>(
            control_matrix,
            control_vector,
            control_noise,
            temp_bq,
        );

        let measurement =
            MeasurementVectorBuffer::<OBSERVATIONS, f64, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                1,
                OBSERVATIONS,
                f64,
            >([zero; OBSERVATIONS]));

        let mut observation_matrix =
            ObservationMatrixMutBuffer::<OBSERVATIONS, STATES, f64, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                STATES,
                { OBSERVATIONS * STATES },
                f64,
            >(
                [zero; { OBSERVATIONS * STATES }],
            ));
        observation_matrix.apply(|mat| {
            mat.set_at(0, 0, 1.0);
        });

        let mut noise_covariance =
            MeasurementNoiseCovarianceMatrixBuffer::<OBSERVATIONS, f64, _>::new(
                MatrixData::new_array::<
                    OBSERVATIONS,
                    OBSERVATIONS,
                    { OBSERVATIONS * OBSERVATIONS },
                    f64,
                >([zero; { OBSERVATIONS * OBSERVATIONS }]),
            );
        noise_covariance.make_scalar(4.0);

        let innovation_vector =
            InnovationVectorBuffer::<OBSERVATIONS, f64, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                1,
                OBSERVATIONS,
                f64,
            >([zero; OBSERVATIONS]));

        let innovation_covariance =
            InnovationCovarianceMatrixBuffer::<OBSERVATIONS, f64, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                OBSERVATIONS,
                { OBSERVATIONS * OBSERVATIONS },
                f64,
            >(
                [zero; { OBSERVATIONS * OBSERVATIONS }],
            ));

        let kalman_gain =
            KalmanGainMatrixBuffer::<STATES, OBSERVATIONS, f64, _>::new(MatrixData::new_array::<
                STATES,
                OBSERVATIONS,
                { STATES * OBSERVATIONS },
                f64,
            >(
                [zero; { STATES * OBSERVATIONS }],
            ));

        let temp_sinv =
            TemporaryResidualCovarianceInvertedMatrixBuffer::<OBSERVATIONS, f64, _>::new(
                MatrixData::new_array::<
                    OBSERVATIONS,
                    OBSERVATIONS,
                    { OBSERVATIONS * OBSERVATIONS },
                    f64,
                >([zero; { OBSERVATIONS * OBSERVATIONS }]),
            );

        let temp_hp =
            TemporaryHPMatrixBuffer::<OBSERVATIONS, STATES, f64, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                STATES,
                { OBSERVATIONS * STATES },
                f64,
            >(
                [zero; { OBSERVATIONS * STATES }],
            ));

        let temp_pht =
            TemporaryPHTMatrixBuffer::<STATES, OBSERVATIONS, f64, _>::new(MatrixData::new_array::<
                STATES,
                OBSERVATIONS,
                { STATES * OBSERVATIONS },
                f64,
            >(
                [zero; { STATES * OBSERVATIONS }],
            ));

        let temp_khp = TemporaryKHPMatrixBuffer::<STATES, f64, _>::new(MatrixData::new_array::<
            STATES,
            STATES,
            { STATES * STATES },
            f64,
        >(
            [zero; { STATES * STATES }]
        ));

        let mut observation = RegularObservationBuilder::new::<STATES, OBSERVATIONS, f64>(
            observation_matrix,
            measurement,
            noise_covariance,
            innovation_vector,
            innovation_covariance,
            kalman_gain,
            temp_sinv,
            temp_hp,
            temp_pht,
            temp_khp,
        );

        for tick in 1..=50 {
            let t = tick as f64 * dt;
            let acceleration = 1.5 + 0.2 * (tick % 5) as f64;
            let jitter = if tick % 2 == 0 { 0.3 } else { -0.3 };
            let height = 0.75 * t * t + jitter;

            filter.predict(acceleration);
            filter.update(&[height]).unwrap();

            reference.predict();
            control.control_vector_mut().apply(|vec| {
                vec.set_row(0, acceleration);
            });
            reference.control(&mut control);
            observation.measurement_vector_mut().apply(|vec| {
                vec.set_row(0, height);
            });
            reference.correct(&mut observation);

            for i in 0..STATES {
                assert_abs_diff_eq!(
                    filter.corrected_state()[(i, 0)],
                    reference.state_vector().get_row(i),
                    epsilon = 1e-6
                );
                assert_abs_diff_eq!(
                    filter.corrected_covariance()[(i, i)],
                    reference.estimate_covariance().get_at(i, i),
                    epsilon = 1e-6
                );
            }
        }
    }
}
