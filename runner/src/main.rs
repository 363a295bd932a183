use runner::{Experiment, ParamGrid, RunDescription};

// Per-seed benchmark of the static-goal scenario with collisions disabled.
// Sanity-check reference from earlier batches: averaging avg_true_reward over
// the four seeds gave mean -220 (std 12) at 280M framesteps and mean -211
// (std 4) at 500M framesteps.
const TRAIN_CMD: &str = "python -m run_algorithm --env=quadrotor_multi \
--train_for_env_steps=1000000000 --algo=APPO --use_rnn=False --num_workers=72 \
--num_envs_per_worker=4 --learning_rate=0.0001 --adam_eps=1e-8 \
--ppo_clip_value=5.0 --recurrence=1 --nonlinearity=tanh \
--actor_critic_share_weights=False --policy_initialization=xavier_uniform \
--adaptive_stddev=False --hidden_size=64 --with_vtrace=False \
--max_policy_lag=100000000 --gae_lambda=1.00 --max_grad_norm=0.0 \
--exploration_loss_coeff=0.0 --rollout=128 --batch_size=1024 \
--quads_use_numba=True --quads_num_agents=4 --quads_episode_duration=7.0 \
--quads_mode=static_goal --quads_dist_between_goals=0.0 \
--quads_collision_reward=0.0";

fn main() {
    let grid = ParamGrid::new().add("seed", vec![0i64, 1111, 2222, 3333]);
    let experiment = Experiment::new(
        "one_static_goal-no_collision-agents_4",
        TRAIN_CMD,
        grid.generate_params(false),
    );
    let description = RunDescription::new("quads_multi_benchmark_v112", vec![experiment]);

    println!("# {}", description.run_name);
    for run in description.generate_runs() {
        println!("{}: {}", run.name, run.cmd);
    }
}
